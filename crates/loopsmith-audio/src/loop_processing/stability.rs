//! Loudness-stability scan.
//!
//! Slides a loop-length window across the buffer and scores each position by
//! how much its loudness varies between four sub-windows. The flattest
//! position is the best place to cut a loop from.

use crate::pcm::ChannelMatrix;

/// Number of sub-windows each candidate is split into.
pub const SUB_WINDOWS: usize = 4;

/// Level floor applied before taking the logarithm.
const RMS_FLOOR: f64 = 1e-10;

/// A scored loop region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// First frame of the region.
    pub start: usize,
    /// Region length in frames.
    pub length: usize,
    /// Loudness spread across the sub-windows, in dB.
    pub score_db: f64,
}

/// Finds the region of `loop_frames` frames with the flattest loudness.
///
/// Candidates start at `0, step, 2 * step, ...` and must fit entirely in the
/// matrix. A start at exactly `frames - loop_frames` counts, so a matrix one
/// loop long still has a candidate at 0. The lowest score wins; on equal
/// scores the earlier start is kept. Returns `None` when no candidate fits.
pub fn scan_stability(
    matrix: &ChannelMatrix,
    loop_frames: usize,
    step: usize,
) -> Option<Candidate> {
    let frames = matrix.frames();
    if loop_frames == 0 || loop_frames > frames || matrix.channel_count() == 0 {
        return None;
    }

    let energy = EnergyIndex::new(matrix);
    let step = step.max(1);

    let mut best: Option<Candidate> = None;
    for start in (0..=frames - loop_frames).step_by(step) {
        let score_db = window_spread_db(&energy, start, loop_frames);
        if best.map_or(true, |b| score_db < b.score_db) {
            best = Some(Candidate {
                start,
                length: loop_frames,
                score_db,
            });
        }
    }
    best
}

/// Splits `length` into [`SUB_WINDOWS`] parts whose sizes differ by at most
/// one, longer parts first.
pub fn sub_window_bounds(start: usize, length: usize) -> Vec<(usize, usize)> {
    let base = length / SUB_WINDOWS;
    let extra = length % SUB_WINDOWS;

    let mut bounds = Vec::with_capacity(SUB_WINDOWS);
    let mut cursor = start;
    for i in 0..SUB_WINDOWS {
        let size = base + usize::from(i < extra);
        if size > 0 {
            bounds.push((cursor, cursor + size));
        }
        cursor += size;
    }
    bounds
}

fn window_spread_db(energy: &EnergyIndex, start: usize, length: usize) -> f64 {
    let levels: Vec<f64> = sub_window_bounds(start, length)
        .into_iter()
        .map(|(a, b)| energy.level_db(a, b))
        .collect();

    let max = levels.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = levels.iter().copied().fold(f64::INFINITY, f64::min);
    max - min
}

/// Prefix sums of squared samples, one table per channel.
struct EnergyIndex {
    prefix: Vec<Vec<f64>>,
}

impl EnergyIndex {
    fn new(matrix: &ChannelMatrix) -> Self {
        let prefix = matrix
            .channels()
            .iter()
            .map(|channel| {
                let mut sums = Vec::with_capacity(channel.len() + 1);
                let mut acc = 0.0;
                sums.push(acc);
                for &s in channel {
                    acc += (s as f64) * (s as f64);
                    sums.push(acc);
                }
                sums
            })
            .collect();
        Self { prefix }
    }

    /// Mean over channels of the channel RMS on `[a, b)`, in dB.
    fn level_db(&self, a: usize, b: usize) -> f64 {
        let n = (b - a) as f64;
        let mean_rms = self
            .prefix
            .iter()
            .map(|sums| ((sums[b] - sums[a]).max(0.0) / n).sqrt())
            .sum::<f64>()
            / self.prefix.len() as f64;
        20.0 * mean_rms.max(RMS_FLOOR).log10()
    }
}
