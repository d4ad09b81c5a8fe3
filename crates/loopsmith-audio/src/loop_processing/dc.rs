//! DC-offset removal.

use crate::pcm::{to_i16, ChannelMatrix};

/// Subtracts each channel's mean so every channel is centered on zero.
///
/// The mean is taken in f64; results are rounded and saturated to i16.
/// An empty matrix is returned unchanged.
pub fn remove_dc_offset(matrix: &ChannelMatrix) -> ChannelMatrix {
    let frames = matrix.frames();
    if frames == 0 {
        return matrix.clone();
    }

    let mut out = matrix.clone();
    for channel in out.channels_mut() {
        let mean = channel.iter().map(|&s| s as f64).sum::<f64>() / frames as f64;
        for sample in channel.iter_mut() {
            *sample = to_i16(*sample as f64 - mean);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn mean(samples: &[i16]) -> f64 {
        samples.iter().map(|&s| s as f64).sum::<f64>() / samples.len() as f64
    }

    #[test]
    fn test_removes_constant_offset() {
        let matrix = ChannelMatrix::from_channels(vec![
            vec![100, 110, 90, 100],
            vec![-50, -40, -60, -50],
        ])
        .unwrap();
        let out = remove_dc_offset(&matrix);
        assert_eq!(out.channel(0), &[0, 10, -10, 0]);
        assert_eq!(out.channel(1), &[0, 10, -10, 0]);
    }

    #[test]
    fn test_mean_near_zero_after_removal() {
        let samples: Vec<i16> = (0..1000)
            .map(|i| (2000.0 + 1000.0 * (i as f64 * 0.05).sin()) as i16)
            .collect();
        let matrix = ChannelMatrix::from_channels(vec![samples]).unwrap();
        let out = remove_dc_offset(&matrix);
        assert!(mean(out.channel(0)).abs() <= 0.5);
    }

    #[test]
    fn test_saturates_extreme_offsets() {
        let matrix = ChannelMatrix::from_channels(vec![vec![i16::MIN, i16::MAX, i16::MAX]]).unwrap();
        let out = remove_dc_offset(&matrix);
        // mean is 10922; the first sample would be -43690
        assert_eq!(out.channel(0)[0], i16::MIN);
        assert_eq!(out.channel(0)[1], 21845);
    }

    #[test]
    fn test_empty_matrix_unchanged() {
        let matrix = ChannelMatrix::from_channels(vec![vec![], vec![]]).unwrap();
        assert_eq!(remove_dc_offset(&matrix), matrix);
    }
}
