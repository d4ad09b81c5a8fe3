//! 16-bit PCM buffers and their per-channel working form.

use crate::error::{AudioError, AudioResult};

/// Interleaved 16-bit PCM audio.
///
/// The sample count is always a whole number of frames; every constructor
/// checks this, so code holding a `PcmBuffer` never sees a partial frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcmBuffer {
    sample_rate: u32,
    channels: u16,
    samples: Vec<i16>,
}

impl PcmBuffer {
    /// Creates a buffer from interleaved samples.
    pub fn new(sample_rate: u32, channels: u16, samples: Vec<i16>) -> AudioResult<Self> {
        if sample_rate == 0 {
            return Err(AudioError::InvalidSampleRate { rate: sample_rate });
        }
        if !(1..=2).contains(&channels) {
            return Err(AudioError::InvalidChannelCount { channels });
        }
        if samples.len() % channels as usize != 0 {
            return Err(AudioError::RaggedBuffer {
                samples: samples.len(),
                channels,
            });
        }
        Ok(Self {
            sample_rate,
            channels,
            samples,
        })
    }

    /// Creates a buffer of `frames` silent frames.
    pub fn silent(sample_rate: u32, channels: u16, frames: usize) -> AudioResult<Self> {
        Self::new(sample_rate, channels, vec![0; frames * channels as usize])
    }

    /// Creates a buffer from little-endian 16-bit bytes.
    pub fn from_bytes_le(sample_rate: u32, channels: u16, bytes: &[u8]) -> AudioResult<Self> {
        if bytes.len() % 2 != 0 {
            return Err(AudioError::unsupported(format!(
                "{} bytes is not a whole number of 16-bit samples",
                bytes.len()
            )));
        }
        let samples = bytes
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        Self::new(sample_rate, channels, samples)
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of channels.
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Interleaved samples.
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    /// Mutable interleaved samples. The length cannot change through a slice.
    pub fn samples_mut(&mut self) -> &mut [i16] {
        &mut self.samples
    }

    /// Consumes the buffer and returns its samples.
    pub fn into_samples(self) -> Vec<i16> {
        self.samples
    }

    /// Number of frames (samples per channel).
    pub fn frame_count(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    /// Returns true if the buffer holds no frames.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.frame_count() as f64 / self.sample_rate as f64
    }

    /// Absolute peak of one channel; 0 for a channel that does not exist.
    pub fn peak(&self, channel: u16) -> u16 {
        if channel >= self.channels {
            return 0;
        }
        self.samples
            .iter()
            .skip(channel as usize)
            .step_by(self.channels as usize)
            .map(|s| s.unsigned_abs())
            .max()
            .unwrap_or(0)
    }

    /// Returns true if `other` has the same sample rate and channel count.
    pub fn same_format(&self, other: &PcmBuffer) -> bool {
        self.sample_rate == other.sample_rate && self.channels == other.channels
    }

    /// Appends `other` to a copy of this buffer.
    pub fn concat(&self, other: &PcmBuffer) -> AudioResult<PcmBuffer> {
        if !self.same_format(other) {
            return Err(AudioError::FormatMismatch {
                expected_rate: self.sample_rate,
                expected_channels: self.channels,
                found_rate: other.sample_rate,
                found_channels: other.channels,
            });
        }
        let mut samples = Vec::with_capacity(self.samples.len() + other.samples.len());
        samples.extend_from_slice(&self.samples);
        samples.extend_from_slice(&other.samples);
        Ok(PcmBuffer {
            sample_rate: self.sample_rate,
            channels: self.channels,
            samples,
        })
    }

    /// Copies `frames` frames starting at `start`, clamped to the buffer.
    pub fn slice_frames(&self, start: usize, frames: usize) -> PcmBuffer {
        let ch = self.channels as usize;
        let start = start.min(self.frame_count());
        let end = start.saturating_add(frames).min(self.frame_count());
        PcmBuffer {
            sample_rate: self.sample_rate,
            channels: self.channels,
            samples: self.samples[start * ch..end * ch].to_vec(),
        }
    }

    /// Little-endian 16-bit bytes, as stored in a WAV data chunk.
    pub fn to_bytes_le(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.samples.len() * 2);
        for sample in &self.samples {
            bytes.extend_from_slice(&sample.to_le_bytes());
        }
        bytes
    }

    /// Splits the interleaved samples into one vector per channel.
    pub fn to_matrix(&self) -> ChannelMatrix {
        let ch = self.channels as usize;
        let frames = self.frame_count();
        let mut channels = vec![Vec::with_capacity(frames); ch];
        for frame in self.samples.chunks_exact(ch) {
            for (channel, &sample) in channels.iter_mut().zip(frame) {
                channel.push(sample);
            }
        }
        ChannelMatrix { channels }
    }
}

/// Per-channel sample storage used while a loop is being built.
///
/// All channels always have the same length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelMatrix {
    channels: Vec<Vec<i16>>,
}

impl ChannelMatrix {
    /// Creates a matrix from channel vectors of equal length.
    pub fn from_channels(channels: Vec<Vec<i16>>) -> AudioResult<Self> {
        if let Some(first) = channels.first() {
            if channels.iter().any(|c| c.len() != first.len()) {
                return Err(AudioError::RaggedBuffer {
                    samples: channels.iter().map(Vec::len).sum(),
                    channels: channels.len() as u16,
                });
            }
        }
        Ok(Self { channels })
    }

    /// Number of channels.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Number of frames.
    pub fn frames(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    /// Samples of one channel.
    pub fn channel(&self, index: usize) -> &[i16] {
        &self.channels[index]
    }

    /// The channel all decisions are made on (channel 0).
    pub fn reference(&self) -> &[i16] {
        self.channels.first().map_or(&[], Vec::as_slice)
    }

    /// All channels.
    pub fn channels(&self) -> &[Vec<i16>] {
        &self.channels
    }

    /// Mutable access to every channel. Lengths must be kept equal.
    pub(crate) fn channels_mut(&mut self) -> &mut [Vec<i16>] {
        &mut self.channels
    }

    /// Copies `frames` frames starting at `start`, clamped to the matrix.
    pub fn slice(&self, start: usize, frames: usize) -> ChannelMatrix {
        let start = start.min(self.frames());
        let end = start.saturating_add(frames).min(self.frames());
        ChannelMatrix {
            channels: self
                .channels
                .iter()
                .map(|c| c[start..end].to_vec())
                .collect(),
        }
    }

    /// Rotates every channel so frame `k` becomes frame `(k + shift) mod len`.
    pub fn rotate(&mut self, shift: i64) {
        let len = self.frames();
        if len == 0 {
            return;
        }
        let mid = shift.rem_euclid(len as i64) as usize;
        for channel in &mut self.channels {
            channel.rotate_left(mid);
        }
    }

    /// Converts back to an interleaved buffer of the given format.
    pub fn into_buffer(self, sample_rate: u32, channels: u16) -> AudioResult<PcmBuffer> {
        if self.channels.len() != channels as usize {
            return Err(AudioError::ChannelMismatch {
                expected: channels,
                found: self.channels.len(),
            });
        }
        let frames = self.frames();
        let mut samples = Vec::with_capacity(frames * self.channels.len());
        for i in 0..frames {
            for channel in &self.channels {
                samples.push(channel[i]);
            }
        }
        PcmBuffer::new(sample_rate, channels, samples)
    }
}

/// Rounds to the nearest integer and saturates to the i16 range.
pub(crate) fn to_i16(value: f64) -> i16 {
    value.round().clamp(i16::MIN as f64, i16::MAX as f64) as i16
}
