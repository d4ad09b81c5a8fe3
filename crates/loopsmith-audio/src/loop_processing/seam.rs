//! Loop seam resolution: natural zero-crossing seams and the synthetic
//! crossfade fallback.

use crate::pcm::{to_i16, ChannelMatrix};

/// Indices where the signal touches or crosses zero.
///
/// Index `i` is a crossing when `x[i] == 0`, or when `x[i]` and `x[i + 1]`
/// have strictly opposite signs.
pub fn zero_crossings(samples: &[i16]) -> Vec<usize> {
    (0..samples.len())
        .filter(|&i| is_crossing(samples, i))
        .collect()
}

fn is_crossing(samples: &[i16], i: usize) -> bool {
    let x = samples[i];
    if x == 0 {
        return true;
    }
    match samples.get(i + 1) {
        Some(&next) => (x > 0 && next < 0) || (x < 0 && next > 0),
        None => false,
    }
}

/// Finds a natural loop start: a zero crossing matched by a later crossing
/// at least `loop_frames` away.
///
/// Crossings are scanned by start `i` ascending, then by end `j` ascending,
/// among those with `j - i >= loop_frames`. The end amplitude is read at
/// `j` modulo the sample count. The first pair whose amplitudes differ by at
/// most `tolerance` wins, and the loop is cut at `(i, i + loop_frames)`.
pub fn find_natural_seam(
    samples: &[i16],
    loop_frames: usize,
    tolerance: u32,
) -> Option<(usize, usize)> {
    if loop_frames == 0 || samples.is_empty() {
        return None;
    }

    let crossings = zero_crossings(samples);
    for (n, &i) in crossings.iter().enumerate() {
        let later = &crossings[n + 1..];
        let first_end = later.partition_point(|&j| j - i < loop_frames);
        if first_end == later.len() {
            // Later starts only shrink the distance.
            break;
        }
        let matched = later[first_end..].iter().any(|&j| {
            let end = samples[j % samples.len()];
            (samples[i] as i32 - end as i32).unsigned_abs() <= tolerance
        });
        if matched {
            return Some((i, i + loop_frames));
        }
    }
    None
}

/// Builds a loop of `loop_frames` frames from the start of `region` when no
/// natural seam exists.
///
/// Per channel, the tail window is blended toward the time-reversed head,
/// then crossfaded against the head itself so the last frames lead back into
/// the first ones. A zero-length crossfade is a plain truncation.
pub fn synthesize_seam(
    region: &ChannelMatrix,
    loop_frames: usize,
    crossfade_frames: usize,
) -> ChannelMatrix {
    let mut out = region.slice(0, loop_frames);
    let len = out.frames();
    let n = crossfade_frames.min(len);
    if n == 0 {
        return out;
    }

    let ramp = linear_ramp(n);
    for channel in out.channels_mut() {
        let head = channel[..n].to_vec();
        blend_toward_mirror(channel, &head, &ramp);
        crossfade_tail(channel, &head, &ramp);
    }
    out
}

/// `linspace(0, 1, n)`; a single-point ramp is `[0.0]`.
pub(crate) fn linear_ramp(n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => (0..n).map(|k| k as f64 / (n - 1) as f64).collect(),
    }
}

/// Replaces the tail with a blend of itself and the reversed head.
fn blend_toward_mirror(channel: &mut [i16], head: &[i16], ramp: &[f64]) {
    let start = channel.len() - ramp.len();
    for (k, &w) in ramp.iter().enumerate() {
        let mirrored = head[head.len() - 1 - k] as f64;
        let tail = channel[start + k] as f64;
        channel[start + k] = to_i16(tail * (1.0 - w) + mirrored * w);
    }
}

/// Crossfades the tail into the head.
fn crossfade_tail(channel: &mut [i16], head: &[i16], ramp: &[f64]) {
    let start = channel.len() - ramp.len();
    for (k, &w) in ramp.iter().enumerate() {
        let tail = channel[start + k] as f64;
        channel[start + k] = to_i16(tail * (1.0 - w) + head[k] as f64 * w);
    }
}
