//! Loopsmith audio core
//!
//! Turns a captured, sustained instrument note into a fixed-length buffer
//! that repeats without an audible seam.
//!
//! # Overview
//!
//! [`make_loop`] runs four stages over an interleaved 16-bit buffer:
//!
//! - **DC removal** - centers each channel of the whole input
//! - **Stability scan** - picks the window whose short-term level varies least
//! - **Phase alignment** - rotates the region so its head matches its tail
//! - **Seam selection** - a zero crossing matched by another at least one loop
//!   later, or a synthesized crossfade when none exists
//!
//! and finishes with short linear fades at both edges. Every decision is
//! recorded in a [`loopsmith_spec::LoopReport`].
//!
//! # Determinism
//!
//! The loop maker is pure. The built-in [`SynthToneSource`] draws its phases
//! and breath noise from PCG32 seeded through BLAKE3, so equal seeds give
//! byte-identical captures, and [`wav`] writes a fixed header with no metadata.
//!
//! # Crate Structure
//!
//! - [`loop_processing`] - [`make_loop`] and its stages
//! - [`pcm`] - interleaved buffers and per-channel matrices
//! - [`tone`] - the [`ToneSource`] seam and the additive synthesizer
//! - [`export`] - the [`Exporter`] seam and WAV exporter
//! - [`envelope`] - ADSR envelope driving the synthesizer
//! - [`rng`] - deterministic RNG with seed derivation
//! - [`wav`] - WAV reading, writing and PCM hashing

pub mod envelope;
pub mod error;
pub mod export;
pub mod loop_processing;
pub mod pcm;
pub mod rng;
pub mod tone;
pub mod wav;

pub use error::{AudioError, AudioResult};
pub use export::{Exporter, WavExporter};
pub use loop_processing::{make_loop, LoopOutcome};
pub use pcm::{ChannelMatrix, PcmBuffer};
pub use tone::{CaptureTiming, NoteCapture, SynthToneSource, ToneSource};
