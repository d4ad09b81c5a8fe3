//! WAV input and output.
//!
//! Files are written with a fixed 44-byte header and no metadata so equal
//! audio always gives equal bytes. Reading goes through `hound` and accepts
//! 16-bit integer PCM with one or two channels.

mod format;
mod hash;
mod reader;
mod writer;


pub use format::{WavFormat, BITS_PER_SAMPLE};
pub use hash::compute_pcm_hash;
pub use reader::{read_wav, read_wav_bytes};
pub use writer::{wav_header, write_wav, write_wav_to_vec, HEADER_LEN};
