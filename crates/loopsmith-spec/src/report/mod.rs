//! Loop diagnostics.
//!
//! Every call to the loop maker produces a [`LoopReport`] next to its buffer.
//! Soft conditions never fail the call; they end up here as [`QualityFlag`]s
//! with stable codes so batch tooling can filter on them.

mod builder;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

pub use builder::LoopReportBuilder;

/// Report schema version.
pub const REPORT_VERSION: u32 = 1;

/// Kinds of non-fatal quality conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityKind {
    /// Q001: input shorter than loop + crossfade; original returned.
    InsufficientLength,
    /// Q002: reference-channel peak below the usability floor.
    WeakSignal,
    /// Q003: the flattest region still exceeds the dB threshold.
    UnstableLoudness,
    /// Q004: no natural zero-crossing seam; crossfade fallback used.
    SyntheticSeam,
}

impl QualityKind {
    /// Returns the stable code string (e.g., "Q001").
    pub fn code(&self) -> &'static str {
        match self {
            QualityKind::InsufficientLength => "Q001",
            QualityKind::WeakSignal => "Q002",
            QualityKind::UnstableLoudness => "Q003",
            QualityKind::SyntheticSeam => "Q004",
        }
    }
}

impl std::fmt::Display for QualityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A quality flag raised while making a loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityFlag {
    /// Stable code (e.g., "Q003").
    pub code: String,
    /// Condition kind.
    pub kind: QualityKind,
    /// Human-readable detail.
    pub message: String,
}

impl QualityFlag {
    /// Creates a flag of the given kind.
    pub fn new(kind: QualityKind, message: impl Into<String>) -> Self {
        Self {
            code: kind.code().to_string(),
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for QualityFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// How the loop boundary was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SeamKind {
    /// Two matching zero crossings exactly one loop apart (region-relative).
    Natural {
        /// Loop start inside the aligned region.
        start: usize,
        /// Matching crossing one loop later.
        end: usize,
    },
    /// Mirrored-head crossfade fallback.
    Synthetic,
    /// The input was returned as-is.
    Untouched,
}

/// Diagnostics for one loop-making call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopReport {
    /// Report schema version.
    pub report_version: u32,
    /// Quality conditions encountered, in detection order.
    pub flags: Vec<QualityFlag>,
    /// Frames in the input buffer.
    pub input_frames: usize,
    /// Frames in the returned buffer.
    pub output_frames: usize,
    /// Sample rate of both buffers.
    pub sample_rate: u32,
    /// Channel count of both buffers.
    pub channels: u16,
    /// Absolute peak of the input's first channel.
    pub reference_peak: u16,
    /// Start frame of the chosen region in the input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_start: Option<usize>,
    /// Loudness spread of the chosen region in dB.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stability_db: Option<f64>,
    /// Circular shift applied by the phase aligner.
    pub phase_shift: i64,
    /// How the seam was produced.
    pub seam: SeamKind,
    /// Length of each edge micro-fade actually applied.
    pub edge_fade_frames: usize,
    /// BLAKE3 hash of the output PCM, when the caller computed one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pcm_hash: Option<String>,
}

impl LoopReport {
    /// Creates a report builder.
    pub fn builder(input_frames: usize, sample_rate: u32, channels: u16) -> LoopReportBuilder {
        LoopReportBuilder::new(input_frames, sample_rate, channels)
    }

    /// Returns true if a flag of this kind was raised.
    pub fn has_flag(&self, kind: QualityKind) -> bool {
        self.flags.iter().any(|f| f.kind == kind)
    }

    /// Returns true when no quality flag was raised.
    pub fn is_clean(&self) -> bool {
        self.flags.is_empty()
    }

    /// Returns the flag codes, in order.
    pub fn flag_codes(&self) -> Vec<&str> {
        self.flags.iter().map(|f| f.code.as_str()).collect()
    }

    /// Serializes the report to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the report to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parses a report from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Standard report filename for an output stem.
    ///
    /// # Example
    ///
    /// ```
    /// use loopsmith_spec::report::LoopReport;
    ///
    /// assert_eq!(LoopReport::filename("c_sharp_main"), "c_sharp_main.loop.json");
    /// ```
    pub fn filename(stem: &str) -> String {
        format!("{}.loop.json", stem)
    }
}
