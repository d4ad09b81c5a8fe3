//! Seamless loop synthesis for sustained tones.
//!
//! [`make_loop`] runs four stages over a private copy of the input:
//!
//! 1. [`remove_dc_offset`] centers every channel.
//! 2. [`scan_stability`] picks the region with the flattest loudness.
//! 3. [`align_phase`] rotates that region so its head lines up with its tail.
//! 4. The seam resolver cuts the loop at a zero crossing that has a matching
//!    crossing at least one loop later ([`find_natural_seam`]) or, failing that, builds a crossfaded seam
//!    ([`synthesize_seam`]). Both paths finish with [`apply_edge_fades`].
//!
//! All decisions are made on channel 0; every operation is applied to all
//! channels together.

mod dc;
mod fade;
mod phase;
mod seam;
mod stability;


use log::{debug, warn};
use loopsmith_spec::{
    FrameParams, LoopParams, LoopReport, LoopReportBuilder, QualityKind, SeamKind,
};

use crate::error::AudioResult;
use crate::pcm::PcmBuffer;

pub use dc::remove_dc_offset;
pub use fade::{apply_edge_fades, fade_in, fade_out};
pub use phase::{align_phase, best_shift, MAX_PHASE_SHIFT};
pub use seam::{find_natural_seam, synthesize_seam, zero_crossings};
pub use stability::{scan_stability, sub_window_bounds, Candidate, SUB_WINDOWS};

/// A finished loop and the diagnostics gathered while making it.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopOutcome {
    /// Exactly `loop_frames` frames, or the untouched input when it was too
    /// short.
    pub buffer: PcmBuffer,
    /// What happened on the way.
    pub report: LoopReport,
}

/// Cuts a seamless loop out of a sustained tone.
///
/// Parameter problems are the only errors. Everything else is reported as a
/// quality flag on the returned report:
///
/// - input shorter than loop + crossfade: the input is returned unchanged (Q001)
/// - channel-0 peak below the weak-signal floor: a loop is still made (Q002)
/// - loudness spread above the threshold: a loop is still made (Q003)
/// - no natural seam: the crossfade fallback is used (Q004)
///
/// # Example
///
/// ```
/// use loopsmith_audio::{make_loop, PcmBuffer};
/// use loopsmith_spec::LoopParams;
///
/// let input = PcmBuffer::silent(8000, 1, 8000).unwrap();
/// let outcome = make_loop(&input, &LoopParams::new(400.0, 30.0)).unwrap();
///
/// assert_eq!(outcome.buffer.frame_count(), 3200);
/// ```
pub fn make_loop(buffer: &PcmBuffer, params: &LoopParams) -> AudioResult<LoopOutcome> {
    let frames = params.to_frames(buffer.sample_rate())?;
    let input_frames = buffer.frame_count();
    let reference_peak = buffer.peak(0);

    let mut report = LoopReport::builder(input_frames, buffer.sample_rate(), buffer.channels())
        .reference_peak(reference_peak);

    if input_frames < frames.required_frames() {
        let message = format!(
            "{} frames available, {} needed for a {}-frame loop with a {}-frame crossfade",
            input_frames,
            frames.required_frames(),
            frames.loop_frames,
            frames.crossfade_frames
        );
        warn!("{}: {}", QualityKind::InsufficientLength, message);
        report.push_flag(QualityKind::InsufficientLength, message);
        return Ok(LoopOutcome {
            buffer: buffer.clone(),
            report: report.build(),
        });
    }

    if u32::from(reference_peak) < params.weak_signal_floor {
        let message = format!(
            "reference peak {} is below the floor of {}",
            reference_peak, params.weak_signal_floor
        );
        warn!("{}: {}", QualityKind::WeakSignal, message);
        report.push_flag(QualityKind::WeakSignal, message);
    }

    let (buffer_out, report) = loop_region(buffer, &frames, report)?;
    Ok(LoopOutcome {
        buffer: buffer_out,
        report: report.output_frames(frames.loop_frames).build(),
    })
}

fn loop_region(
    buffer: &PcmBuffer,
    frames: &FrameParams,
    mut report: LoopReportBuilder,
) -> AudioResult<(PcmBuffer, LoopReportBuilder)> {
    let matrix = remove_dc_offset(&buffer.to_matrix());

    let candidate = scan_stability(&matrix, frames.loop_frames, frames.window_step).unwrap_or(
        Candidate {
            start: 0,
            length: frames.loop_frames,
            score_db: 0.0,
        },
    );
    let region_frames = frames.required_frames();
    let start = candidate.start.min(matrix.frames() - region_frames);
    debug!(
        "stability scan picked frame {} (spread {:.3} dB), region starts at {}",
        candidate.start, candidate.score_db, start
    );
    report = report.region(start, candidate.score_db);

    if candidate.score_db > frames.db_threshold {
        let message = format!(
            "loudness spread {:.2} dB exceeds {:.2} dB",
            candidate.score_db, frames.db_threshold
        );
        warn!("{}: {}", QualityKind::UnstableLoudness, message);
        report.push_flag(QualityKind::UnstableLoudness, message);
    }

    let region = matrix.slice(start, region_frames);
    let (aligned, shift) = align_phase(
        &region,
        frames.crossfade_frames,
        frames.max_phase_shift_frames,
    );
    debug!("phase alignment shift {}", shift);
    report = report.phase_shift(shift);

    let mut looped = match find_natural_seam(
        aligned.reference(),
        frames.loop_frames,
        frames.zero_crossing_tolerance,
    ) {
        Some((seam_start, seam_end)) => {
            debug!("natural seam at {}..{}", seam_start, seam_end);
            report = report.seam(SeamKind::Natural {
                start: seam_start,
                end: seam_end,
            });
            aligned.slice(seam_start, frames.loop_frames)
        }
        None => {
            let message = format!(
                "no zero crossings at least {} frames apart within {} of each other",
                frames.loop_frames, frames.zero_crossing_tolerance
            );
            warn!("{}: {}", QualityKind::SyntheticSeam, message);
            report.push_flag(QualityKind::SyntheticSeam, message);
            report = report.seam(SeamKind::Synthetic);
            synthesize_seam(&aligned, frames.loop_frames, frames.crossfade_frames)
        }
    };

    let faded = apply_edge_fades(&mut looped, frames.edge_fade_frames);
    report = report.edge_fade_frames(faded);

    let out = looped.into_buffer(buffer.sample_rate(), buffer.channels())?;
    Ok((out, report))
}
