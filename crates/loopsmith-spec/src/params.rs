//! Loop parameters and their frame-domain form.
//!
//! Parameters are expressed in milliseconds so the same JSON works at any
//! sample rate; [`LoopParams::to_frames`] converts them once per buffer.

use serde::{Deserialize, Serialize};

use crate::error::ParamError;

/// Smallest step between stability-scan candidates, in frames.
pub const MIN_WINDOW_STEP: usize = 256;

/// Tunable parameters for the loop maker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoopParams {
    /// Target loop length in milliseconds.
    #[serde(default = "default_loop_ms")]
    pub loop_ms: f64,
    /// Crossfade (head/tail window) length in milliseconds.
    #[serde(default = "default_crossfade_ms")]
    pub crossfade_ms: f64,
    /// Acceptable loudness spread across the loop, in dB.
    #[serde(default = "default_db_threshold")]
    pub db_threshold: f64,
    /// Upper bound on the phase alignment search, in milliseconds.
    #[serde(default = "default_max_phase_shift_ms")]
    pub max_phase_shift_ms: f64,
    /// Maximum amplitude difference between two matching zero crossings.
    #[serde(default = "default_zero_crossing_tolerance")]
    pub zero_crossing_tolerance: u32,
    /// Reference-channel peak below which the input is flagged as weak.
    #[serde(default = "default_weak_signal_floor")]
    pub weak_signal_floor: u32,
    /// Lower bound for the edge micro-fade, in milliseconds.
    #[serde(default = "default_min_edge_fade_ms")]
    pub min_edge_fade_ms: f64,
}

fn default_loop_ms() -> f64 {
    400.0
}

fn default_crossfade_ms() -> f64 {
    30.0
}

fn default_db_threshold() -> f64 {
    1.5
}

fn default_max_phase_shift_ms() -> f64 {
    10.0
}

fn default_zero_crossing_tolerance() -> u32 {
    50
}

fn default_weak_signal_floor() -> u32 {
    500
}

fn default_min_edge_fade_ms() -> f64 {
    6.0
}

impl Default for LoopParams {
    fn default() -> Self {
        Self {
            loop_ms: default_loop_ms(),
            crossfade_ms: default_crossfade_ms(),
            db_threshold: default_db_threshold(),
            max_phase_shift_ms: default_max_phase_shift_ms(),
            zero_crossing_tolerance: default_zero_crossing_tolerance(),
            weak_signal_floor: default_weak_signal_floor(),
            min_edge_fade_ms: default_min_edge_fade_ms(),
        }
    }
}

impl LoopParams {
    /// Creates parameters with the given loop and crossfade lengths and
    /// defaults for everything else.
    pub fn new(loop_ms: f64, crossfade_ms: f64) -> Self {
        Self {
            loop_ms,
            crossfade_ms,
            ..Self::default()
        }
    }

    /// Sets the loudness threshold.
    pub fn with_db_threshold(mut self, db_threshold: f64) -> Self {
        self.db_threshold = db_threshold;
        self
    }

    /// Sets the phase search bound.
    pub fn with_max_phase_shift_ms(mut self, max_phase_shift_ms: f64) -> Self {
        self.max_phase_shift_ms = max_phase_shift_ms;
        self
    }

    /// Sets the zero-crossing amplitude tolerance.
    pub fn with_zero_crossing_tolerance(mut self, tolerance: u32) -> Self {
        self.zero_crossing_tolerance = tolerance;
        self
    }

    /// Parses parameters from JSON, filling omitted fields with defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Checks every field independently of the sample rate.
    pub fn validate(&self) -> Result<(), ParamError> {
        if !self.loop_ms.is_finite() || self.loop_ms <= 0.0 {
            return Err(ParamError::invalid(
                "loop_ms",
                format!("must be a positive duration, got {}", self.loop_ms),
            ));
        }
        if !self.crossfade_ms.is_finite() || self.crossfade_ms < 0.0 {
            return Err(ParamError::invalid(
                "crossfade_ms",
                format!("must be zero or positive, got {}", self.crossfade_ms),
            ));
        }
        if self.db_threshold.is_nan() || self.db_threshold < 0.0 {
            return Err(ParamError::invalid(
                "db_threshold",
                format!("must be zero or positive, got {}", self.db_threshold),
            ));
        }
        if !self.max_phase_shift_ms.is_finite() || self.max_phase_shift_ms < 0.0 {
            return Err(ParamError::invalid(
                "max_phase_shift_ms",
                format!("must be zero or positive, got {}", self.max_phase_shift_ms),
            ));
        }
        if !self.min_edge_fade_ms.is_finite() || self.min_edge_fade_ms < 0.0 {
            return Err(ParamError::invalid(
                "min_edge_fade_ms",
                format!("must be zero or positive, got {}", self.min_edge_fade_ms),
            ));
        }
        Ok(())
    }

    /// Validates and converts every time value to frames at `sample_rate`.
    pub fn to_frames(&self, sample_rate: u32) -> Result<FrameParams, ParamError> {
        self.validate()?;
        if sample_rate == 0 {
            return Err(ParamError::ZeroSampleRate);
        }

        let loop_frames = ms_to_frames(self.loop_ms, sample_rate);
        if loop_frames == 0 {
            return Err(ParamError::LoopTooShort {
                loop_ms: self.loop_ms,
                sample_rate,
            });
        }

        let crossfade_frames = ms_to_frames(self.crossfade_ms, sample_rate);
        if crossfade_frames > loop_frames {
            return Err(ParamError::CrossfadeExceedsLoop {
                crossfade_frames,
                loop_frames,
            });
        }

        let edge_fade_ms = self.min_edge_fade_ms.max((self.crossfade_ms / 5.0).floor());

        Ok(FrameParams {
            loop_frames,
            crossfade_frames,
            max_phase_shift_frames: ms_to_frames(self.max_phase_shift_ms, sample_rate),
            edge_fade_frames: ms_to_frames(edge_fade_ms, sample_rate),
            window_step: MIN_WINDOW_STEP.max(crossfade_frames),
            zero_crossing_tolerance: self.zero_crossing_tolerance,
            db_threshold: self.db_threshold,
        })
    }
}

/// Loop parameters resolved against a sample rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameParams {
    /// Exact output length.
    pub loop_frames: usize,
    /// Head/tail window and crossfade length.
    pub crossfade_frames: usize,
    /// Phase search bound before the crossfade and hard caps are applied.
    pub max_phase_shift_frames: usize,
    /// Length of each edge micro-fade.
    pub edge_fade_frames: usize,
    /// Advance between stability-scan candidates.
    pub window_step: usize,
    /// Maximum amplitude difference between matching zero crossings.
    pub zero_crossing_tolerance: u32,
    /// Acceptable loudness spread in dB.
    pub db_threshold: f64,
}

impl FrameParams {
    /// Minimum input length for a loop to be attempted.
    pub fn required_frames(&self) -> usize {
        self.loop_frames + self.crossfade_frames
    }
}

/// Converts milliseconds to a whole number of frames, rounding down.
pub fn ms_to_frames(ms: f64, sample_rate: u32) -> usize {
    if ms <= 0.0 {
        return 0;
    }
    (ms * sample_rate as f64 / 1000.0).floor() as usize
}
