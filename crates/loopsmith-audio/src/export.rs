//! Writing finished buffers to disk.

use std::fs;
use std::io::BufWriter;
use std::path::Path;

use crate::error::AudioResult;
use crate::pcm::PcmBuffer;
use crate::wav::{compute_pcm_hash, write_wav};

/// Encodes a buffer to a file.
pub trait Exporter {
    /// File extension without the dot.
    fn extension(&self) -> &'static str;

    /// Writes `buffer` to `path` and returns the BLAKE3 hash of its PCM data.
    fn export(&self, buffer: &PcmBuffer, path: &Path) -> AudioResult<String>;
}

/// Deterministic 16-bit PCM WAV exporter.
#[derive(Debug, Clone, Copy, Default)]
pub struct WavExporter;

impl Exporter for WavExporter {
    fn extension(&self) -> &'static str {
        "wav"
    }

    fn export(&self, buffer: &PcmBuffer, path: &Path) -> AudioResult<String> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut writer = BufWriter::new(fs::File::create(path)?);
        write_wav(&mut writer, buffer)?;
        writer.into_inner().map_err(|e| e.into_error())?;
        Ok(compute_pcm_hash(buffer))
    }
}
