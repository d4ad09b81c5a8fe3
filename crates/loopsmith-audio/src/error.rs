//! Error types for the audio core.

use loopsmith_spec::{BackendError, ParamError};
use thiserror::Error;

/// Result type for audio operations.
pub type AudioResult<T> = Result<T, AudioError>;

/// Errors that can occur while building, looping or encoding audio.
#[derive(Debug, Error)]
pub enum AudioError {
    /// Loop parameters failed validation.
    #[error(transparent)]
    InvalidParams(#[from] ParamError),

    /// Invalid sample rate.
    #[error("invalid sample rate: {rate}")]
    InvalidSampleRate {
        /// The invalid sample rate.
        rate: u32,
    },

    /// Channel count outside 1..=2.
    #[error("invalid channel count: {channels} (expected 1 or 2)")]
    InvalidChannelCount {
        /// The invalid channel count.
        channels: u16,
    },

    /// Interleaved sample count is not a multiple of the channel count.
    #[error("{samples} samples cannot be split evenly into {channels} channels")]
    RaggedBuffer {
        /// Number of interleaved samples.
        samples: usize,
        /// Declared channel count.
        channels: u16,
    },

    /// A channel matrix does not match the buffer format it is converted to.
    #[error("channel mismatch: expected {expected} channels, found {found}")]
    ChannelMismatch {
        /// Channels declared by the target format.
        expected: u16,
        /// Channels present in the matrix.
        found: usize,
    },

    /// Two buffers with different formats were combined.
    #[error(
        "format mismatch: {expected_rate} Hz/{expected_channels} ch vs {found_rate} Hz/{found_channels} ch"
    )]
    FormatMismatch {
        /// Sample rate of the first buffer.
        expected_rate: u32,
        /// Channel count of the first buffer.
        expected_channels: u16,
        /// Sample rate of the second buffer.
        found_rate: u32,
        /// Channel count of the second buffer.
        found_channels: u16,
    },

    /// WAV data is not 16-bit integer PCM with one or two channels.
    #[error("unsupported audio format: {message}")]
    UnsupportedFormat {
        /// What is unsupported.
        message: String,
    },

    /// WAV decoding error.
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The tone source could not produce a capture.
    #[error("tone source error: {message}")]
    ToneSource {
        /// Error message.
        message: String,
    },
}

impl AudioError {
    /// Creates an unsupported format error.
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            message: message.into(),
        }
    }

    /// Creates a tone source error.
    pub fn tone_source(message: impl Into<String>) -> Self {
        Self::ToneSource {
            message: message.into(),
        }
    }
}

impl BackendError for AudioError {
    fn code(&self) -> &'static str {
        match self {
            AudioError::InvalidParams(_) => "AUDIO_001",
            AudioError::InvalidSampleRate { .. } => "AUDIO_002",
            AudioError::InvalidChannelCount { .. } => "AUDIO_003",
            AudioError::RaggedBuffer { .. } => "AUDIO_004",
            AudioError::ChannelMismatch { .. } => "AUDIO_005",
            AudioError::FormatMismatch { .. } => "AUDIO_006",
            AudioError::UnsupportedFormat { .. } => "AUDIO_007",
            AudioError::Wav(_) => "AUDIO_008",
            AudioError::Io(_) => "AUDIO_009",
            AudioError::ToneSource { .. } => "AUDIO_010",
        }
    }

    fn category(&self) -> &'static str {
        match self {
            AudioError::InvalidParams(_) => "params",
            _ => "audio",
        }
    }
}
