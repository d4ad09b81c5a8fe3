//! Error types for parameter validation and the shared backend error trait.

use thiserror::Error;

/// Errors raised when loop or pack parameters are unusable.
///
/// These are the only fatal conditions of the loop maker: everything else
/// (short input, weak signal, unstable loudness, synthetic seam) is reported
/// as a quality flag and never stops processing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamError {
    /// A field holds a value outside its valid range.
    #[error("invalid parameter '{field}': {message}")]
    InvalidValue {
        /// Parameter name as it appears in JSON.
        field: &'static str,
        /// What is wrong with it.
        message: String,
    },

    /// Time values cannot be converted to frames at a zero sample rate.
    #[error("invalid parameter 'sample_rate': must be greater than zero")]
    ZeroSampleRate,

    /// The loop length rounds down to zero frames at this sample rate.
    #[error("invalid parameter 'loop_ms': {loop_ms} ms is shorter than one frame at {sample_rate} Hz")]
    LoopTooShort {
        /// Requested loop length.
        loop_ms: f64,
        /// Sample rate used for the conversion.
        sample_rate: u32,
    },

    /// The head/tail window would not fit inside the loop.
    #[error(
        "invalid parameter 'crossfade_ms': {crossfade_frames} frames exceed the loop length of {loop_frames} frames"
    )]
    CrossfadeExceedsLoop {
        /// Crossfade length in frames.
        crossfade_frames: usize,
        /// Loop length in frames.
        loop_frames: usize,
    },
}

impl ParamError {
    /// Creates an invalid value error.
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            message: message.into(),
        }
    }

    /// Name of the offending parameter.
    pub fn field(&self) -> &'static str {
        match self {
            ParamError::InvalidValue { field, .. } => field,
            ParamError::ZeroSampleRate => "sample_rate",
            ParamError::LoopTooShort { .. } => "loop_ms",
            ParamError::CrossfadeExceedsLoop { .. } => "crossfade_ms",
        }
    }
}

impl BackendError for ParamError {
    fn code(&self) -> &'static str {
        match self {
            ParamError::InvalidValue { .. } => "PARAM_001",
            ParamError::ZeroSampleRate => "PARAM_002",
            ParamError::LoopTooShort { .. } => "PARAM_003",
            ParamError::CrossfadeExceedsLoop { .. } => "PARAM_004",
        }
    }

    fn category(&self) -> &'static str {
        "params"
    }
}

/// Common trait for errors surfaced to users.
///
/// Every crate-level error type implements this so the CLI can report a
/// stable code next to the message, in both human and JSON output.
///
/// # Example
///
/// ```ignore
/// use loopsmith_spec::error::BackendError;
///
/// fn handle_error<E: BackendError>(err: E) {
///     eprintln!("[{}] {}", err.code(), err.message());
/// }
/// ```
pub trait BackendError: std::error::Error {
    /// Stable error code such as "AUDIO_003" or "PARAM_001".
    fn code(&self) -> &'static str;

    /// Human-readable message; defaults to `Display`.
    fn message(&self) -> String {
        self.to_string()
    }

    /// Error category for grouping ("audio", "params", ...).
    fn category(&self) -> &'static str;
}
