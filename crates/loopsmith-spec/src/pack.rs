//! Sound-pack configuration.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ParamError;
use crate::notes::{default_instruments, default_note_keys, InstrumentEntry, NoteKey};
use crate::params::LoopParams;

/// Configuration for rendering a sound pack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackConfig {
    /// Capture sample rate in Hz.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    /// Output gain of the tone source.
    #[serde(default = "default_gain")]
    pub gain: f64,
    /// Base seed for any randomness in the tone source.
    #[serde(default)]
    pub seed: u32,
    /// Length of one segment in milliseconds; the loop is one segment long.
    #[serde(default = "default_segment_ms")]
    pub segment_ms: f64,
    /// Loop crossfade in milliseconds.
    #[serde(default = "default_crossfade_ms")]
    pub crossfade_ms: f64,
    /// Sustain capture length in seconds.
    #[serde(default = "default_sustain_s")]
    pub sustain_s: f64,
    /// Fade applied to attack, release and full takes, in milliseconds.
    #[serde(default = "default_edge_fade_ms")]
    pub edge_fade_ms: f64,
    /// Resource namespace.
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Prefix of every event name.
    #[serde(default = "default_event_prefix")]
    pub event_prefix: String,
    /// Pack format written to `pack.mcmeta`.
    #[serde(default = "default_pack_format")]
    pub pack_format: u32,
    /// Pack description written to `pack.mcmeta`.
    #[serde(default = "default_description")]
    pub description: String,
    /// Programs to render.
    #[serde(default = "default_instruments")]
    pub instruments: Vec<InstrumentEntry>,
    /// Note keys to render.
    #[serde(default = "default_note_keys")]
    pub notes: Vec<String>,
    /// Loop parameters; derived from `segment_ms` and `crossfade_ms` if absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loop_params: Option<LoopParams>,
}

fn default_sample_rate() -> u32 {
    44100
}

fn default_gain() -> f64 {
    0.6
}

fn default_segment_ms() -> f64 {
    450.0
}

fn default_crossfade_ms() -> f64 {
    100.0
}

fn default_sustain_s() -> f64 {
    1.0
}

fn default_edge_fade_ms() -> f64 {
    10.0
}

fn default_namespace() -> String {
    "loopsmith".to_string()
}

fn default_event_prefix() -> String {
    "note".to_string()
}

fn default_pack_format() -> u32 {
    12
}

fn default_description() -> String {
    "Looped instrument notes".to_string()
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            gain: default_gain(),
            seed: 0,
            segment_ms: default_segment_ms(),
            crossfade_ms: default_crossfade_ms(),
            sustain_s: default_sustain_s(),
            edge_fade_ms: default_edge_fade_ms(),
            namespace: default_namespace(),
            event_prefix: default_event_prefix(),
            pack_format: default_pack_format(),
            description: default_description(),
            instruments: default_instruments(),
            notes: default_note_keys(),
            loop_params: None,
        }
    }
}

impl PackConfig {
    /// Parses a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Checks the configuration before any audio is rendered.
    pub fn validate(&self) -> Result<(), ParamError> {
        if self.sample_rate == 0 {
            return Err(ParamError::ZeroSampleRate);
        }
        if !self.gain.is_finite() || self.gain <= 0.0 {
            return Err(ParamError::invalid(
                "gain",
                format!("must be positive, got {}", self.gain),
            ));
        }
        for (field, value) in [
            ("segment_ms", self.segment_ms),
            ("sustain_s", self.sustain_s),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ParamError::invalid(
                    field,
                    format!("must be a positive duration, got {}", value),
                ));
            }
        }
        for (field, value) in [
            ("crossfade_ms", self.crossfade_ms),
            ("edge_fade_ms", self.edge_fade_ms),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ParamError::invalid(
                    field,
                    format!("must be zero or positive, got {}", value),
                ));
            }
        }
        if self.namespace.is_empty() {
            return Err(ParamError::invalid("namespace", "must not be empty"));
        }
        if self.instruments.is_empty() {
            return Err(ParamError::invalid("instruments", "at least one is required"));
        }

        let mut seen = HashSet::new();
        for instrument in &self.instruments {
            if instrument.name.is_empty() {
                return Err(ParamError::invalid("instruments", "names must not be empty"));
            }
            if !seen.insert(instrument.name.as_str()) {
                return Err(ParamError::invalid(
                    "instruments",
                    format!("duplicate name '{}'", instrument.name),
                ));
            }
        }

        self.note_keys()?;
        self.effective_loop_params().validate()
    }

    /// Parses every configured note key.
    pub fn note_keys(&self) -> Result<Vec<NoteKey>, ParamError> {
        if self.notes.is_empty() {
            return Err(ParamError::invalid("notes", "at least one is required"));
        }
        self.notes.iter().map(|k| NoteKey::parse(k)).collect()
    }

    /// Loop parameters used for the sustain segment.
    pub fn effective_loop_params(&self) -> LoopParams {
        self.loop_params
            .clone()
            .unwrap_or_else(|| LoopParams::new(self.segment_ms, self.crossfade_ms))
    }

    /// Total take length: three segments.
    pub fn total_s(&self) -> f64 {
        self.segment_ms * 3.0 / 1000.0
    }

    /// Attack capture length in seconds: one third of the take.
    pub fn attack_s(&self) -> f64 {
        self.segment_ms / 1000.0
    }

    /// Release capture length in seconds: one third of the take.
    pub fn release_s(&self) -> f64 {
        self.segment_ms / 1000.0
    }

    /// Instruments selected by name, or all of them when `names` is empty.
    pub fn select_instruments(&self, names: &[String]) -> Result<Vec<InstrumentEntry>, ParamError> {
        if names.is_empty() {
            return Ok(self.instruments.clone());
        }
        names
            .iter()
            .map(|name| {
                self.instruments
                    .iter()
                    .find(|i| &i.name == name)
                    .cloned()
                    .ok_or_else(|| {
                        ParamError::invalid("instruments", format!("unknown instrument '{}'", name))
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_validate() {
        let config = PackConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.sample_rate, 44100);
        assert_eq!(config.pack_format, 12);
        assert_eq!(config.instruments.len(), 21);
        assert_eq!(config.notes.len(), 60);
    }

    #[test]
    fn test_derived_timing() {
        let config = PackConfig::default();
        assert!((config.total_s() - 1.35).abs() < 1e-12);
        assert!((config.attack_s() - 0.45).abs() < 1e-12);
        assert!((config.release_s() - 0.45).abs() < 1e-12);
    }

    #[test]
    fn test_effective_loop_params() {
        let config = PackConfig::default();
        assert_eq!(config.effective_loop_params(), LoopParams::new(450.0, 100.0));

        let custom = PackConfig {
            loop_params: Some(LoopParams::new(300.0, 20.0)),
            ..PackConfig::default()
        };
        assert_eq!(custom.effective_loop_params().loop_ms, 300.0);
    }

    #[test]
    fn test_json_partial_config() {
        let config = PackConfig::from_json(
            r#"{
                "namespace": "demo",
                "instruments": [{"name": "flute", "bank": 0, "preset": 73}],
                "notes": ["C", "A+#"]
            }"#,
        )
        .unwrap();
        assert_eq!(config.namespace, "demo");
        assert_eq!(config.segment_ms, 450.0);
        assert_eq!(config.note_keys().unwrap().len(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_unknown_fields() {
        assert!(PackConfig::from_json(r#"{"segments": 3}"#).is_err());
    }

    #[test]
    fn test_rejects_bad_note() {
        let config = PackConfig {
            notes: vec!["C".to_string(), "E#".to_string()],
            ..PackConfig::default()
        };
        assert_eq!(config.validate().unwrap_err().field(), "notes");
    }

    #[test]
    fn test_rejects_duplicate_instruments() {
        let config = PackConfig {
            instruments: vec![
                InstrumentEntry::new("piano", 0, 0),
                InstrumentEntry::new("piano", 0, 1),
            ],
            ..PackConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_rejects_non_positive_durations() {
        let config = PackConfig {
            segment_ms: 0.0,
            ..PackConfig::default()
        };
        assert_eq!(config.validate().unwrap_err().field(), "segment_ms");

        let config = PackConfig {
            sustain_s: -1.0,
            ..PackConfig::default()
        };
        assert_eq!(config.validate().unwrap_err().field(), "sustain_s");
    }

    #[test]
    fn test_select_instruments() {
        let config = PackConfig::default();
        assert_eq!(config.select_instruments(&[]).unwrap().len(), 21);

        let picked = config
            .select_instruments(&["cello".to_string(), "harp".to_string()])
            .unwrap();
        assert_eq!(picked[0].preset, 42);
        assert_eq!(picked[1].preset, 46);

        assert!(config.select_instruments(&["kazoo".to_string()]).is_err());
    }
}
