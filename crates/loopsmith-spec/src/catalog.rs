//! Sound catalog (`sounds.json`) and pack metadata (`pack.mcmeta`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One playable sound event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundEvent {
    /// Resource locations of the sounds played by this event.
    pub sounds: Vec<String>,
}

/// The four files exported per note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotePart {
    /// Attack segment (`<slug>_in`).
    Attack,
    /// Seamless loop (`<slug>_main`).
    Loop,
    /// Release segment (`<slug>_out`).
    Release,
    /// Complete one-shot take (`<slug>`).
    Full,
}

impl NotePart {
    /// All parts in export order.
    pub const ALL: [NotePart; 4] = [
        NotePart::Attack,
        NotePart::Loop,
        NotePart::Release,
        NotePart::Full,
    ];

    /// File stem for a note slug.
    pub fn file_stem(&self, slug: &str) -> String {
        match self {
            NotePart::Attack => format!("{}_in", slug),
            NotePart::Loop => format!("{}_main", slug),
            NotePart::Release => format!("{}_out", slug),
            NotePart::Full => slug.to_string(),
        }
    }

    /// Suffix appended to the event name.
    fn event_suffix(&self) -> &'static str {
        match self {
            NotePart::Attack => "_1",
            NotePart::Loop => "_2",
            NotePart::Release => "_3",
            NotePart::Full => "",
        }
    }
}

/// Ordered map from event name to sound event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SoundCatalog {
    events: BTreeMap<String, SoundEvent>,
}

impl SoundCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the four events of one rendered note.
    pub fn insert_note(&mut self, namespace: &str, prefix: &str, instrument: &str, slug: &str) {
        for part in NotePart::ALL {
            let event = format!("{}_{}_{}{}", prefix, instrument, slug, part.event_suffix());
            let location = format!("{}:{}/{}", namespace, instrument, part.file_stem(slug));
            self.events.insert(
                event,
                SoundEvent {
                    sounds: vec![location],
                },
            );
        }
    }

    /// Looks up an event.
    pub fn get(&self, event: &str) -> Option<&SoundEvent> {
        self.events.get(event)
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if no events are registered.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Serializes the catalog to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Resource pack descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackMeta {
    /// Pack body.
    pub pack: PackInfo,
}

/// Body of [`PackMeta`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackInfo {
    /// Pack format revision understood by the consumer.
    pub pack_format: u32,
    /// Display description.
    pub description: String,
}

impl PackMeta {
    /// Creates pack metadata.
    pub fn new(pack_format: u32, description: impl Into<String>) -> Self {
        Self {
            pack: PackInfo {
                pack_format,
                description: description.into(),
            },
        }
    }

    /// Serializes to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
