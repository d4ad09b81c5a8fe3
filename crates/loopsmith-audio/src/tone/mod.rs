//! Tone sources: where sustained notes come from.
//!
//! A [`ToneSource`] is an explicitly owned handle; the pack pipeline borrows
//! it mutably for each capture and the loop maker never sees it. The crate
//! ships [`SynthToneSource`], an additive synthesizer that needs no external
//! sound bank.

mod synth;
mod timbre;

pub use synth::SynthToneSource;
pub use timbre::{Timbre, TimbreProfile};

use crate::error::AudioResult;
use crate::pcm::PcmBuffer;

/// How long to hold each phase of a captured note.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureTiming {
    /// Seconds recorded right after note on.
    pub attack_s: f64,
    /// Seconds recorded while the note is held.
    pub sustain_s: f64,
    /// Seconds recorded after note off.
    pub release_s: f64,
    /// MIDI velocity (1-127).
    pub velocity: u8,
    /// Hold the sustain pedal from before note on until note off.
    pub use_pedal: bool,
}

impl Default for CaptureTiming {
    fn default() -> Self {
        Self {
            attack_s: 0.45,
            sustain_s: 1.0,
            release_s: 0.45,
            velocity: 100,
            use_pedal: true,
        }
    }
}

/// The three consecutive parts of one captured note.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteCapture {
    /// From note on to the end of the attack window.
    pub attack: PcmBuffer,
    /// The held part that gets looped.
    pub sustain: PcmBuffer,
    /// From note off to the end of the release window.
    pub release: PcmBuffer,
}

impl NoteCapture {
    /// The whole capture as one buffer.
    pub fn joined(&self) -> AudioResult<PcmBuffer> {
        self.attack.concat(&self.sustain)?.concat(&self.release)
    }
}

/// A playable instrument that renders notes into stereo PCM.
pub trait ToneSource {
    /// Sample rate of every capture.
    fn sample_rate(&self) -> u32;

    /// Selects the program used by later captures.
    fn select_program(&mut self, bank: u16, preset: u8) -> AudioResult<()>;

    /// Plays one note and records its attack, sustain and release.
    ///
    /// Sequence: pedal down (if enabled), note on, attack, sustain, note off,
    /// pedal up, release.
    fn capture(&mut self, note: u8, timing: &CaptureTiming) -> AudioResult<NoteCapture>;
}

/// Equal-tempered frequency of a MIDI note (A4 = 69 = 440 Hz).
pub fn midi_to_frequency(note: u8) -> f64 {
    440.0 * 2f64.powf((note as f64 - 69.0) / 12.0)
}

/// Whole frames in `seconds`, rounding down.
pub(crate) fn seconds_to_frames(seconds: f64, sample_rate: u32) -> usize {
    if seconds <= 0.0 || !seconds.is_finite() {
        return 0;
    }
    (seconds * sample_rate as f64).floor() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midi_to_frequency() {
        assert!((midi_to_frequency(69) - 440.0).abs() < 1e-9);
        assert!((midi_to_frequency(57) - 220.0).abs() < 1e-9);
        assert!((midi_to_frequency(60) - 261.6256).abs() < 1e-3);
    }

    #[test]
    fn test_seconds_to_frames() {
        assert_eq!(seconds_to_frames(0.45, 44100), 19845);
        assert_eq!(seconds_to_frames(1.0, 8000), 8000);
        assert_eq!(seconds_to_frames(-1.0, 8000), 0);
        assert_eq!(seconds_to_frames(f64::NAN, 8000), 0);
    }
}
