//! Loopsmith Canonical Types
//!
//! This crate holds the serializable types shared by the loop maker and the
//! sound-pack generator: loop parameters, the diagnostics report, the note and
//! instrument tables, pack configuration and the sound catalog.
//!
//! # Example
//!
//! ```
//! use loopsmith_spec::LoopParams;
//!
//! let params = LoopParams::from_json(r#"{"loop_ms": 450, "crossfade_ms": 100}"#).unwrap();
//! let frames = params.to_frames(44100).unwrap();
//!
//! assert_eq!(frames.loop_frames, 19845);
//! assert_eq!(frames.crossfade_frames, 4410);
//! ```
//!
//! # Modules
//!
//! - [`error`]: Parameter errors and the shared [`BackendError`] trait
//! - [`params`]: Loop parameters and their frame-domain form
//! - [`report`]: Loop diagnostics and quality flags
//! - [`notes`]: Note keys and the instrument table
//! - [`pack`]: Sound-pack configuration
//! - [`catalog`]: Sound catalog and pack metadata

pub mod catalog;
pub mod error;
pub mod notes;
pub mod pack;
pub mod params;
pub mod report;

// Re-export commonly used types at the crate root
pub use catalog::{NotePart, PackMeta, SoundCatalog, SoundEvent};
pub use error::{BackendError, ParamError};
pub use notes::{default_instruments, default_note_keys, InstrumentEntry, NoteKey};
pub use pack::PackConfig;
pub use params::{ms_to_frames, FrameParams, LoopParams, MIN_WINDOW_STEP};
pub use report::{LoopReport, LoopReportBuilder, QualityFlag, QualityKind, SeamKind};
