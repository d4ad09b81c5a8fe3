//! JSON output types for machine-readable CLI output.
//!
//! Every command run with `--json` prints exactly one object with `success`,
//! `errors`, `warnings` and an optional `result`.

use loopsmith_audio::AudioError;
use loopsmith_spec::{BackendError, LoopReport, ParamError};
use serde::{Deserialize, Serialize};

/// Error codes for CLI operations.
///
/// Backend errors keep their own codes (`AUDIO_xxx`, `PARAM_xxx`); these cover
/// everything the CLI itself detects.
pub mod error_codes {
    /// File could not be read or written
    pub const FILE_IO: &str = "CLI_001";
    /// JSON parse error
    pub const JSON_PARSE: &str = "CLI_002";
    /// Anything else
    pub const GENERAL: &str = "CLI_003";
}

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g., "CLI_001", "AUDIO_007")
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl JsonError {
    /// Creates a new error with code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// A structured warning in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonWarning {
    /// Quality flag code (e.g., "Q004")
    pub code: String,
    /// Human-readable warning message
    pub message: String,
}

impl JsonWarning {
    /// Creates a new warning with code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Envelope printed by every `--json` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandOutput<T> {
    /// Whether the command succeeded
    pub success: bool,
    /// Errors that stopped the command
    pub errors: Vec<JsonError>,
    /// Non-fatal conditions
    pub warnings: Vec<JsonWarning>,
    /// Command result (on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
}

impl<T> CommandOutput<T> {
    /// Creates a successful output.
    pub fn success(result: T, warnings: Vec<JsonWarning>) -> Self {
        Self {
            success: true,
            errors: Vec::new(),
            warnings,
            result: Some(result),
        }
    }

    /// Creates a failed output.
    pub fn failure(errors: Vec<JsonError>) -> Self {
        Self {
            success: false,
            errors,
            warnings: Vec::new(),
            result: None,
        }
    }
}

/// Result of the `loop` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoopResult {
    /// Path of the written loop
    pub output: String,
    /// Path of the written report, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_path: Option<String>,
    /// Full loop diagnostics
    pub report: LoopReport,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

/// Quality flags of a report as JSON warnings.
pub fn report_warnings(report: &LoopReport) -> Vec<JsonWarning> {
    report
        .flags
        .iter()
        .map(|f| JsonWarning::new(f.code.clone(), f.message.clone()))
        .collect()
}

/// Converts an error chain to a JSON error, keeping backend codes.
pub fn error_to_json(err: &anyhow::Error) -> JsonError {
    let message = format!("{:#}", err);
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<AudioError>() {
            return JsonError::new(e.code(), message);
        }
        if let Some(e) = cause.downcast_ref::<ParamError>() {
            return JsonError::new(e.code(), message);
        }
        if cause.downcast_ref::<serde_json::Error>().is_some() {
            return JsonError::new(error_codes::JSON_PARSE, message);
        }
        if cause.downcast_ref::<std::io::Error>().is_some() {
            return JsonError::new(error_codes::FILE_IO, message);
        }
    }
    JsonError::new(error_codes::GENERAL, message)
}
