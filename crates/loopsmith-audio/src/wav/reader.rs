//! WAV reading through `hound`.

use std::io::Read;
use std::path::Path;

use super::format::BITS_PER_SAMPLE;
use crate::error::{AudioError, AudioResult};
use crate::pcm::PcmBuffer;

/// Reads a 16-bit integer PCM WAV file with one or two channels.
pub fn read_wav(path: impl AsRef<Path>) -> AudioResult<PcmBuffer> {
    let reader = hound::WavReader::open(path)?;
    decode(reader)
}

/// Decodes 16-bit integer PCM WAV bytes with one or two channels.
pub fn read_wav_bytes(bytes: &[u8]) -> AudioResult<PcmBuffer> {
    let reader = hound::WavReader::new(std::io::Cursor::new(bytes))?;
    decode(reader)
}

fn decode<R: Read>(reader: hound::WavReader<R>) -> AudioResult<PcmBuffer> {
    let spec = reader.spec();
    if spec.sample_format != hound::SampleFormat::Int || spec.bits_per_sample != BITS_PER_SAMPLE {
        return Err(AudioError::unsupported(format!(
            "{}-bit {:?} samples (expected 16-bit integer PCM)",
            spec.bits_per_sample, spec.sample_format
        )));
    }
    if !(1..=2).contains(&spec.channels) {
        return Err(AudioError::unsupported(format!(
            "{} channels (expected mono or stereo)",
            spec.channels
        )));
    }

    let samples = reader
        .into_samples::<i16>()
        .collect::<Result<Vec<_>, _>>()?;
    PcmBuffer::new(spec.sample_rate, spec.channels, samples)
}
