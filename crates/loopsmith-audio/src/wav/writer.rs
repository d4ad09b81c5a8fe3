//! Deterministic WAV writing.

use std::io::{self, Write};

use super::format::WavFormat;
use crate::pcm::PcmBuffer;

/// Size of the canonical RIFF/WAVE header.
pub const HEADER_LEN: usize = 44;

/// Canonical 44-byte header for `data_size` bytes of PCM.
///
/// No optional chunks and no timestamps, so identical audio always produces
/// identical files.
pub fn wav_header(format: &WavFormat, data_size: u32) -> Vec<u8> {
    let mut header = Vec::with_capacity(HEADER_LEN);

    // RIFF header; size excludes the first 8 bytes
    header.extend_from_slice(b"RIFF");
    header.extend_from_slice(&(36 + data_size).to_le_bytes());
    header.extend_from_slice(b"WAVE");

    // fmt chunk
    header.extend_from_slice(b"fmt ");
    header.extend_from_slice(&16u32.to_le_bytes());
    header.extend_from_slice(&1u16.to_le_bytes()); // PCM
    header.extend_from_slice(&format.channels.to_le_bytes());
    header.extend_from_slice(&format.sample_rate.to_le_bytes());
    header.extend_from_slice(&format.byte_rate().to_le_bytes());
    header.extend_from_slice(&format.block_align().to_le_bytes());
    header.extend_from_slice(&format.bits_per_sample.to_le_bytes());

    // data chunk
    header.extend_from_slice(b"data");
    header.extend_from_slice(&data_size.to_le_bytes());
    header
}

/// Writes a buffer as a complete WAV file.
pub fn write_wav<W: Write>(writer: &mut W, buffer: &PcmBuffer) -> io::Result<()> {
    let pcm = buffer.to_bytes_le();
    writer.write_all(&wav_header(&WavFormat::of(buffer), pcm.len() as u32))?;
    writer.write_all(&pcm)
}

/// Encodes a buffer as WAV bytes.
pub fn write_wav_to_vec(buffer: &PcmBuffer) -> Vec<u8> {
    let pcm = buffer.to_bytes_le();
    let mut bytes = wav_header(&WavFormat::of(buffer), pcm.len() as u32);
    bytes.extend_from_slice(&pcm);
    bytes
}
