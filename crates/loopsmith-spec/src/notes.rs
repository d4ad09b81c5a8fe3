//! Note keys and the instrument program table used for sound packs.
//!
//! Note keys use a compact notation: a letter `A`–`G`, an octave marker
//! (`--`, `-`, none, `+`, `++`) and an optional trailing `#`. The unmarked
//! octave is MIDI 36 (C2); the markers step down to 24 and 0 and up to 48
//! and 60.

use serde::{Deserialize, Serialize};

use crate::error::ParamError;

const NATURALS: [char; 7] = ['C', 'D', 'E', 'F', 'G', 'A', 'B'];
const SHARPABLE: [char; 5] = ['C', 'D', 'F', 'G', 'A'];
const OCTAVE_MARKERS: [&str; 5] = ["--", "-", "", "+", "++"];

/// A parsed note key such as `C#`, `A--` or `F++#`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoteKey {
    letter: char,
    octave: Octave,
    sharp: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Octave {
    DoubleDown,
    Down,
    Base,
    Up,
    DoubleUp,
}

impl Octave {
    fn from_marker(marker: &str) -> Option<Self> {
        match marker {
            "--" => Some(Octave::DoubleDown),
            "-" => Some(Octave::Down),
            "" => Some(Octave::Base),
            "+" => Some(Octave::Up),
            "++" => Some(Octave::DoubleUp),
            _ => None,
        }
    }

    fn marker(&self) -> &'static str {
        match self {
            Octave::DoubleDown => "--",
            Octave::Down => "-",
            Octave::Base => "",
            Octave::Up => "+",
            Octave::DoubleUp => "++",
        }
    }

    fn base_midi(&self) -> u8 {
        match self {
            Octave::DoubleDown => 0,
            Octave::Down => 24,
            Octave::Base => 36,
            Octave::Up => 48,
            Octave::DoubleUp => 60,
        }
    }
}

fn semitone(letter: char) -> u8 {
    match letter {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        _ => 11,
    }
}

impl NoteKey {
    /// Parses a note key.
    pub fn parse(key: &str) -> Result<Self, ParamError> {
        let mut chars = key.chars();
        let letter = chars
            .next()
            .filter(|c| NATURALS.contains(c))
            .ok_or_else(|| ParamError::invalid("notes", format!("'{}' must start with A-G", key)))?;

        let rest = chars.as_str();
        let (marker, sharp) = match rest.strip_suffix('#') {
            Some(marker) => (marker, true),
            None => (rest, false),
        };

        let octave = Octave::from_marker(marker).ok_or_else(|| {
            ParamError::invalid("notes", format!("'{}' has an unknown octave marker", key))
        })?;

        if sharp && !SHARPABLE.contains(&letter) {
            return Err(ParamError::invalid(
                "notes",
                format!("'{}' names a sharp that does not exist", key),
            ));
        }

        Ok(Self {
            letter,
            octave,
            sharp,
        })
    }

    /// MIDI note number.
    pub fn midi(&self) -> u8 {
        self.octave.base_midi() + semitone(self.letter) + u8::from(self.sharp)
    }

    /// File-system friendly name, e.g. `C--#` becomes `c_minus_minus_sharp`.
    pub fn slug(&self) -> String {
        self.to_string()
            .to_lowercase()
            .replace('#', "_sharp")
            .replace('-', "_minus")
            .replace('+', "_plus")
    }
}

impl std::fmt::Display for NoteKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.letter,
            self.octave.marker(),
            if self.sharp { "#" } else { "" }
        )
    }
}

impl std::str::FromStr for NoteKey {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Every key of the default table: naturals octave by octave, then sharps.
pub fn default_note_keys() -> Vec<String> {
    let naturals = OCTAVE_MARKERS
        .iter()
        .flat_map(|m| NATURALS.iter().map(move |l| format!("{}{}", l, m)));
    let sharps = OCTAVE_MARKERS
        .iter()
        .flat_map(|m| SHARPABLE.iter().map(move |l| format!("{}{}#", l, m)));
    naturals.chain(sharps).collect()
}

/// A named program on the tone source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstrumentEntry {
    /// Directory and event name component.
    pub name: String,
    /// Bank number.
    pub bank: u16,
    /// General MIDI program number.
    pub preset: u8,
}

impl InstrumentEntry {
    /// Creates an instrument entry.
    pub fn new(name: impl Into<String>, bank: u16, preset: u8) -> Self {
        Self {
            name: name.into(),
            bank,
            preset,
        }
    }
}

/// The default instrument table.
pub fn default_instruments() -> Vec<InstrumentEntry> {
    [
        ("piano", 0),
        ("rhodes_piano", 4),
        ("chorused_piano", 5),
        ("acoustic_steel", 25),
        ("over_driven", 29),
        ("distortion", 30),
        ("violin", 40),
        ("viola", 41),
        ("cello", 42),
        ("strings", 45),
        ("harp", 46),
        ("sax", 65),
        ("flute", 73),
        ("pan_flute", 75),
        ("guitar", 24),
        ("trumpet", 56),
        ("trombone", 57),
        ("brass", 61),
        ("muted_trumpet", 59),
        ("lead_chiff", 83),
        ("lead_bass", 87),
    ]
    .into_iter()
    .map(|(name, preset)| InstrumentEntry::new(name, 0, preset))
    .collect()
}
