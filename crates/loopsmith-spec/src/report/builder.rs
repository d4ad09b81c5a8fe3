//! Builder pattern for loop reports.

use super::{LoopReport, QualityFlag, QualityKind, SeamKind, REPORT_VERSION};

/// Builder that accumulates diagnostics as the loop stages run.
#[derive(Debug, Clone)]
pub struct LoopReportBuilder {
    flags: Vec<QualityFlag>,
    input_frames: usize,
    output_frames: usize,
    sample_rate: u32,
    channels: u16,
    reference_peak: u16,
    region_start: Option<usize>,
    stability_db: Option<f64>,
    phase_shift: i64,
    seam: SeamKind,
    edge_fade_frames: usize,
    pcm_hash: Option<String>,
}

impl LoopReportBuilder {
    /// Creates a builder for an input of the given shape.
    ///
    /// Output length defaults to the input length and the seam to
    /// [`SeamKind::Untouched`], which is what an early return reports.
    pub fn new(input_frames: usize, sample_rate: u32, channels: u16) -> Self {
        Self {
            flags: Vec::new(),
            input_frames,
            output_frames: input_frames,
            sample_rate,
            channels,
            reference_peak: 0,
            region_start: None,
            stability_db: None,
            phase_shift: 0,
            seam: SeamKind::Untouched,
            edge_fade_frames: 0,
            pcm_hash: None,
        }
    }

    /// Raises a quality flag.
    pub fn flag(mut self, kind: QualityKind, message: impl Into<String>) -> Self {
        self.flags.push(QualityFlag::new(kind, message));
        self
    }

    /// Raises a quality flag through a mutable reference.
    pub fn push_flag(&mut self, kind: QualityKind, message: impl Into<String>) {
        self.flags.push(QualityFlag::new(kind, message));
    }

    /// Sets the reference-channel peak.
    pub fn reference_peak(mut self, peak: u16) -> Self {
        self.reference_peak = peak;
        self
    }

    /// Records the stability scan result.
    pub fn region(mut self, start: usize, stability_db: f64) -> Self {
        self.region_start = Some(start);
        self.stability_db = Some(stability_db);
        self
    }

    /// Records the phase shift.
    pub fn phase_shift(mut self, shift: i64) -> Self {
        self.phase_shift = shift;
        self
    }

    /// Records the seam kind.
    pub fn seam(mut self, seam: SeamKind) -> Self {
        self.seam = seam;
        self
    }

    /// Records the edge fade length actually applied.
    pub fn edge_fade_frames(mut self, frames: usize) -> Self {
        self.edge_fade_frames = frames;
        self
    }

    /// Sets the output length.
    pub fn output_frames(mut self, frames: usize) -> Self {
        self.output_frames = frames;
        self
    }

    /// Attaches a PCM hash.
    pub fn pcm_hash(mut self, hash: impl Into<String>) -> Self {
        self.pcm_hash = Some(hash.into());
        self
    }

    /// Finishes the report.
    pub fn build(self) -> LoopReport {
        LoopReport {
            report_version: REPORT_VERSION,
            flags: self.flags,
            input_frames: self.input_frames,
            output_frames: self.output_frames,
            sample_rate: self.sample_rate,
            channels: self.channels,
            reference_peak: self.reference_peak,
            region_start: self.region_start,
            stability_db: self.stability_db,
            phase_shift: self.phase_shift,
            seam: self.seam,
            edge_fade_frames: self.edge_fade_frames,
            pcm_hash: self.pcm_hash,
        }
    }
}
