//! Linear fades: edge micro-fades for loops and take fades for one-shots.

use loopsmith_spec::ms_to_frames;

use super::seam::linear_ramp;
use crate::pcm::{to_i16, ChannelMatrix, PcmBuffer};

/// Fades the first and last `fade_frames` of every channel.
///
/// Fade-in gains follow `linspace(0, 1, n)` and fade-out gains
/// `linspace(1, 0, n)`, so the first and last frames become silent. Nothing
/// happens when `fade_frames` is zero or the matrix is not longer than two
/// fades. Returns the fade length applied.
pub fn apply_edge_fades(matrix: &mut ChannelMatrix, fade_frames: usize) -> usize {
    let frames = matrix.frames();
    if fade_frames == 0 || frames <= 2 * fade_frames {
        return 0;
    }

    let ramp = linear_ramp(fade_frames);
    for channel in matrix.channels_mut() {
        for (k, &w) in ramp.iter().enumerate() {
            channel[k] = to_i16(channel[k] as f64 * w);
            let end = frames - 1 - k;
            channel[end] = to_i16(channel[end] as f64 * w);
        }
    }
    fade_frames
}

/// Fades the start of a buffer in over `ms` milliseconds.
///
/// The fade is clamped to the buffer length. Returns the frames faded.
pub fn fade_in(buffer: &mut PcmBuffer, ms: f64) -> usize {
    let frames = ms_to_frames(ms, buffer.sample_rate()).min(buffer.frame_count());
    let ch = buffer.channels() as usize;
    let ramp = linear_ramp(frames);
    for (frame, &w) in buffer.samples_mut().chunks_exact_mut(ch).zip(&ramp) {
        scale_frame(frame, w);
    }
    frames
}

/// Fades the end of a buffer out over `ms` milliseconds.
///
/// The fade is clamped to the buffer length. Returns the frames faded.
pub fn fade_out(buffer: &mut PcmBuffer, ms: f64) -> usize {
    let frames = ms_to_frames(ms, buffer.sample_rate()).min(buffer.frame_count());
    let ch = buffer.channels() as usize;
    let ramp = linear_ramp(frames);
    for (frame, &w) in buffer
        .samples_mut()
        .chunks_exact_mut(ch)
        .rev()
        .zip(&ramp)
    {
        scale_frame(frame, w);
    }
    frames
}

fn scale_frame(frame: &mut [i16], gain: f64) {
    for sample in frame {
        *sample = to_i16(*sample as f64 * gain);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_edge_fades_silence_both_ends() {
        let mut matrix =
            ChannelMatrix::from_channels(vec![vec![1000; 20], vec![-1000; 20]]).unwrap();
        assert_eq!(apply_edge_fades(&mut matrix, 5), 5);

        for ch in 0..2 {
            let c = matrix.channel(ch);
            assert_eq!(c[0], 0);
            assert_eq!(c[19], 0);
            assert_eq!(c[10].abs(), 1000);
        }
        assert_eq!(&matrix.channel(0)[..5], &[0, 250, 500, 750, 1000]);
        assert_eq!(&matrix.channel(0)[15..], &[1000, 750, 500, 250, 0]);
    }

    #[test]
    fn test_edge_fades_skipped_when_too_short() {
        let mut matrix = ChannelMatrix::from_channels(vec![vec![1000; 10]]).unwrap();
        let before = matrix.clone();
        assert_eq!(apply_edge_fades(&mut matrix, 5), 0);
        assert_eq!(matrix, before);

        assert_eq!(apply_edge_fades(&mut matrix, 0), 0);
        assert_eq!(matrix, before);
    }

    #[test]
    fn test_fade_in_stereo() {
        // 1 ms at 4000 Hz is 4 frames.
        let mut buffer = PcmBuffer::new(4000, 2, vec![900; 16]).unwrap();
        assert_eq!(fade_in(&mut buffer, 1.0), 4);
        assert_eq!(
            buffer.samples(),
            &[0, 0, 300, 300, 600, 600, 900, 900, 900, 900, 900, 900, 900, 900, 900, 900]
        );
    }

    #[test]
    fn test_fade_out_mono() {
        let mut buffer = PcmBuffer::new(4000, 1, vec![900; 6]).unwrap();
        assert_eq!(fade_out(&mut buffer, 1.0), 4);
        assert_eq!(buffer.samples(), &[900, 900, 900, 600, 300, 0]);
    }

    #[test]
    fn test_fades_clamp_to_buffer() {
        let mut buffer = PcmBuffer::new(4000, 1, vec![900; 2]).unwrap();
        assert_eq!(fade_out(&mut buffer, 100.0), 2);
        assert_eq!(buffer.samples(), &[900, 0]);
    }
}
