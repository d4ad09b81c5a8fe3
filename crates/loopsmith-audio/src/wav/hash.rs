//! PCM hashing.

use crate::pcm::PcmBuffer;

/// BLAKE3 hex digest of a buffer's little-endian PCM bytes.
///
/// Only the samples are hashed, never the header, so the digest identifies
/// the audio regardless of container.
pub fn compute_pcm_hash(buffer: &PcmBuffer) -> String {
    blake3::hash(&buffer.to_bytes_le()).to_hex().to_string()
}
