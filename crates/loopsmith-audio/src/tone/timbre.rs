//! Harmonic profiles for the built-in synthesizer, keyed by GM program.

use crate::envelope::AdsrParams;

/// Broad instrument family chosen from a General MIDI program number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timbre {
    /// Acoustic piano and chromatic percussion.
    Piano,
    /// Rhodes and chorused electric piano.
    ElectricPiano,
    /// Drawbar, church and reed organs.
    Organ,
    /// Plucked strings, basses and harp.
    Guitar,
    /// Bowed strings, ensembles and pads.
    Strings,
    /// Trumpet, trombone and brass sections.
    Brass,
    /// Saxophones, oboe, clarinet.
    Reed,
    /// Flutes and pipes.
    Flute,
    /// Synth leads and overdriven guitars.
    Lead,
}

/// Synthesis settings for one [`Timbre`].
#[derive(Debug, Clone, PartialEq)]
pub struct TimbreProfile {
    /// Relative amplitude of each harmonic, fundamental first.
    pub harmonics: &'static [f64],
    /// Amplitude envelope.
    pub envelope: AdsrParams,
    /// Level of the filtered noise mixed in, relative to the harmonics.
    pub breath: f64,
}

impl Timbre {
    /// Picks the family for a GM program number.
    pub fn from_program(preset: u8) -> Self {
        match preset {
            4 | 5 => Timbre::ElectricPiano,
            0..=15 => Timbre::Piano,
            16..=23 => Timbre::Organ,
            29 | 30 => Timbre::Lead,
            24..=39 | 46 => Timbre::Guitar,
            40..=55 => Timbre::Strings,
            56..=63 => Timbre::Brass,
            64..=71 => Timbre::Reed,
            72..=79 => Timbre::Flute,
            80..=87 => Timbre::Lead,
            _ => Timbre::Strings,
        }
    }

    /// Lowercase family name.
    pub fn name(self) -> &'static str {
        match self {
            Timbre::Piano => "piano",
            Timbre::ElectricPiano => "electric_piano",
            Timbre::Organ => "organ",
            Timbre::Guitar => "guitar",
            Timbre::Strings => "strings",
            Timbre::Brass => "brass",
            Timbre::Reed => "reed",
            Timbre::Flute => "flute",
            Timbre::Lead => "lead",
        }
    }

    /// Synthesis settings for this family.
    pub fn profile(self) -> TimbreProfile {
        match self {
            Timbre::Piano => TimbreProfile {
                harmonics: &[1.0, 0.55, 0.3, 0.18, 0.1, 0.06, 0.03],
                envelope: AdsrParams::new(0.005, 0.25, 0.45, 0.3),
                breath: 0.0,
            },
            Timbre::ElectricPiano => TimbreProfile {
                harmonics: &[1.0, 0.35, 0.08, 0.12, 0.03],
                envelope: AdsrParams::new(0.004, 0.3, 0.5, 0.3),
                breath: 0.0,
            },
            Timbre::Organ => TimbreProfile {
                harmonics: &[1.0, 0.8, 0.6, 0.5, 0.0, 0.3, 0.0, 0.25],
                envelope: AdsrParams::new(0.01, 0.02, 0.95, 0.08),
                breath: 0.0,
            },
            Timbre::Guitar => TimbreProfile {
                harmonics: &[1.0, 0.6, 0.4, 0.25, 0.15, 0.08],
                envelope: AdsrParams::new(0.003, 0.2, 0.4, 0.25),
                breath: 0.0,
            },
            Timbre::Strings => TimbreProfile {
                harmonics: &[1.0, 0.5, 0.33, 0.25, 0.2, 0.16, 0.12, 0.1],
                envelope: AdsrParams::new(0.08, 0.2, 0.85, 0.3),
                breath: 0.0,
            },
            Timbre::Brass => TimbreProfile {
                harmonics: &[1.0, 0.8, 0.65, 0.5, 0.38, 0.28, 0.2, 0.14],
                envelope: AdsrParams::new(0.05, 0.1, 0.8, 0.15),
                breath: 0.0,
            },
            Timbre::Reed => TimbreProfile {
                harmonics: &[1.0, 0.1, 0.6, 0.08, 0.4, 0.05, 0.25],
                envelope: AdsrParams::new(0.04, 0.1, 0.85, 0.12),
                breath: 0.04,
            },
            Timbre::Flute => TimbreProfile {
                harmonics: &[1.0, 0.2, 0.08, 0.03],
                envelope: AdsrParams::new(0.06, 0.1, 0.9, 0.12),
                breath: 0.08,
            },
            Timbre::Lead => TimbreProfile {
                harmonics: &[1.0, 0.5, 0.33, 0.25, 0.2, 0.17, 0.14, 0.12, 0.11, 0.1],
                envelope: AdsrParams::new(0.01, 0.05, 0.9, 0.1),
                breath: 0.0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_families() {
        assert_eq!(Timbre::from_program(0), Timbre::Piano);
        assert_eq!(Timbre::from_program(4), Timbre::ElectricPiano);
        assert_eq!(Timbre::from_program(5), Timbre::ElectricPiano);
        assert_eq!(Timbre::from_program(19), Timbre::Organ);
        assert_eq!(Timbre::from_program(24), Timbre::Guitar);
        assert_eq!(Timbre::from_program(29), Timbre::Lead);
        assert_eq!(Timbre::from_program(30), Timbre::Lead);
        assert_eq!(Timbre::from_program(40), Timbre::Strings);
        assert_eq!(Timbre::from_program(46), Timbre::Guitar);
        assert_eq!(Timbre::from_program(57), Timbre::Brass);
        assert_eq!(Timbre::from_program(65), Timbre::Reed);
        assert_eq!(Timbre::from_program(73), Timbre::Flute);
        assert_eq!(Timbre::from_program(87), Timbre::Lead);
        assert_eq!(Timbre::from_program(127), Timbre::Strings);
    }

    #[test]
    fn test_profiles_are_usable() {
        for preset in 0..=127u8 {
            let profile = Timbre::from_program(preset).profile();
            assert_eq!(profile.harmonics[0], 1.0);
            assert!(profile.envelope.sustain > 0.3);
            assert!(profile.envelope.release <= 0.3);
            assert!(profile.breath >= 0.0);
        }
    }

    #[test]
    fn test_only_wind_families_breathe() {
        assert!(Timbre::Flute.profile().breath > 0.0);
        assert!(Timbre::Reed.profile().breath > 0.0);
        assert_eq!(Timbre::Strings.profile().breath, 0.0);
        assert_eq!(Timbre::Flute.name(), "flute");
    }
}
