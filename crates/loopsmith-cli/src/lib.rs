//! Loopsmith CLI library.
//!
//! Holds the command implementations behind the `loopsmith` binary so they
//! can be driven from tests: single-file looping and sound-pack rendering.

pub mod commands;
pub mod logging;
