//! Phase alignment of a region's head against its tail.

use crate::pcm::ChannelMatrix;

/// Hard cap on the alignment search, in frames.
pub const MAX_PHASE_SHIFT: usize = 200;

/// Windows at or below this length are not aligned.
const MIN_ALIGN_WINDOW: usize = 4;

/// Rotates `region` so its head lines up with its tail.
///
/// The first `window` frames of the reference channel are circularly shifted
/// by each `s` in `[-max_shift, max_shift]` and compared with the last
/// `window` frames by sum of squared differences. The best shift is applied
/// to every channel as a rotation of the whole region.
///
/// Shifts are tried as `0, -1, 1, -2, 2, ...` rather than ascending from
/// `-max_shift`, and only a strictly lower error replaces the current best.
/// Ties therefore resolve to the smallest `|s|` (negative first), and a
/// region that is already aligned always comes back with shift 0.
///
/// Returns the aligned region and the shift applied.
pub fn align_phase(region: &ChannelMatrix, window: usize, max_shift: usize) -> (ChannelMatrix, i64) {
    let shift = best_shift(region.reference(), window, max_shift);
    let mut aligned = region.clone();
    if shift != 0 {
        aligned.rotate(shift);
    }
    (aligned, shift)
}

/// Shift with the lowest head/tail error on one channel.
pub fn best_shift(samples: &[i16], window: usize, max_shift: usize) -> i64 {
    if window <= MIN_ALIGN_WINDOW || samples.len() < window {
        return 0;
    }

    let head = &samples[..window];
    let tail = &samples[samples.len() - window..];
    let limit = max_shift.min(window / 2).min(MAX_PHASE_SHIFT) as i64;

    let mut best = 0i64;
    let mut best_err = shifted_error(head, tail, 0);
    for magnitude in 1..=limit {
        for shift in [-magnitude, magnitude] {
            let err = shifted_error(head, tail, shift);
            if err < best_err {
                best_err = err;
                best = shift;
            }
        }
    }
    best
}

/// Squared error between `head` rotated by `shift` and `tail`.
///
/// The rotated head is `rotated[k] = head[(k - shift) mod n]`.
fn shifted_error(head: &[i16], tail: &[i16], shift: i64) -> f64 {
    let n = head.len() as i64;
    tail.iter()
        .enumerate()
        .map(|(k, &t)| {
            let h = head[(k as i64 - shift).rem_euclid(n) as usize];
            let d = h as f64 - t as f64;
            d * d
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sine(frames: usize, period: f64, amp: f64, phase: f64) -> Vec<i16> {
        (0..frames)
            .map(|i| {
                let t = i as f64 / period + phase;
                (amp * (2.0 * std::f64::consts::PI * t).sin()).round() as i16
            })
            .collect()
    }

    #[test]
    fn test_aligned_region_keeps_shift_zero() {
        // 1000 frames hold exactly 10 periods, so head and tail agree.
        let samples = sine(1000, 100.0, 10000.0, 0.0);
        let region = ChannelMatrix::from_channels(vec![samples]).unwrap();
        let (aligned, shift) = align_phase(&region, 200, 50);
        assert_eq!(shift, 0);
        assert_eq!(aligned, region);
    }

    #[test]
    fn test_realignment_is_idempotent() {
        let samples = sine(1000, 100.0, 10000.0, 0.0);
        let region = ChannelMatrix::from_channels(vec![samples.clone(), samples]).unwrap();
        let (once, first) = align_phase(&region, 200, 50);
        let (twice, second) = align_phase(&once, 200, 50);
        assert_eq!(first, 0);
        assert_eq!(second, 0);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_finds_known_offset() {
        // The tail is the head delayed by 3 frames: tail[k] = head[k - 3].
        let head: Vec<i16> = (0..40).map(|i| ((i * 37) % 23) as i16 * 100).collect();
        let mut samples = head.clone();
        samples.extend(std::iter::repeat(0).take(20));
        samples.extend((0..40).map(|k| head[(k + 40 - 3) % 40]));

        assert_eq!(best_shift(&samples, 40, 10), 3);
    }

    #[test]
    fn test_rotation_applies_to_all_channels() {
        let head: Vec<i16> = (0..40).map(|i| ((i * 37) % 23) as i16 * 100).collect();
        let mut left = head.clone();
        left.extend(std::iter::repeat(0).take(20));
        left.extend((0..40).map(|k| head[(k + 40 - 3) % 40]));
        let right: Vec<i16> = (0..left.len() as i16).collect();

        let region = ChannelMatrix::from_channels(vec![left.clone(), right.clone()]).unwrap();
        let (aligned, shift) = align_phase(&region, 40, 10);
        assert_eq!(shift, 3);
        assert_eq!(aligned.channel(0)[0], left[3]);
        assert_eq!(aligned.channel(1)[0], 3);
        assert_eq!(aligned.channel(1)[aligned.frames() - 1], 2);
    }

    #[test]
    fn test_tied_shifts_keep_smallest_negative_first() {
        let mut samples = vec![0i16; 12];
        samples[2] = 100;
        samples[7] = 100;
        samples[9] = 100;
        // Head peak at 2; tail peaks at 1 and 3. Shifts -1 and +1 each fix one.
        assert_eq!(best_shift(&samples, 6, 3), -1);
    }

    #[test]
    fn test_search_is_bounded() {
        let head: Vec<i16> = (0..40).map(|i| ((i * 37) % 23) as i16 * 100).collect();
        let mut samples = head.clone();
        samples.extend((0..40).map(|k| head[(k + 40 - 9) % 40]));

        // The true offset lies outside a search limited to 5 frames.
        let shift = best_shift(&samples, 40, 5);
        assert!(shift.abs() <= 5);
    }

    #[test]
    fn test_small_window_skips_alignment() {
        let samples = vec![1, 2, 3, 4, 5, 6, 7, 8];
        assert_eq!(best_shift(&samples, 4, 2), 0);
        assert_eq!(best_shift(&samples, 0, 2), 0);
    }

    #[test]
    fn test_shifted_error_rotation_direction() {
        let head = [1, 2, 3, 4, 5];
        // head rotated by 1 is [5, 1, 2, 3, 4]
        let tail = [5, 1, 2, 3, 4];
        assert_eq!(shifted_error(&head, &tail, 1), 0.0);
        assert!(shifted_error(&head, &tail, -1) > 0.0);
    }
}
