//! Mono WAV export.
//!
//! Rendered notes and offline captures are written as 16-bit PCM with no
//! timestamps or variable metadata. The BLAKE3 hash of the PCM payload
//! identifies a render independently of the header.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::EngineResult;
use crate::synthesis::AudioBuffer;

/// Size of the canonical RIFF/fmt/data header.
pub const HEADER_LEN: usize = 44;

const BITS_PER_SAMPLE: u16 = 16;

/// Writes a complete mono WAV stream.
///
/// # Arguments
/// * `writer` - Output writer
/// * `sample_rate` - Sample rate in Hz
/// * `pcm` - Little-endian 16-bit samples
pub fn write_wav<W: Write>(writer: &mut W, sample_rate: u32, pcm: &[u8]) -> std::io::Result<()> {
    let block_align = BITS_PER_SAMPLE / 8;
    let byte_rate = sample_rate * u32::from(block_align);
    let data_size = pcm.len() as u32;

    writer.write_all(b"RIFF")?;
    writer.write_all(&(36 + data_size).to_le_bytes())?;
    writer.write_all(b"WAVE")?;

    writer.write_all(b"fmt ")?;
    writer.write_all(&16u32.to_le_bytes())?;
    writer.write_all(&1u16.to_le_bytes())?; // PCM
    writer.write_all(&1u16.to_le_bytes())?; // mono
    writer.write_all(&sample_rate.to_le_bytes())?;
    writer.write_all(&byte_rate.to_le_bytes())?;
    writer.write_all(&block_align.to_le_bytes())?;
    writer.write_all(&BITS_PER_SAMPLE.to_le_bytes())?;

    writer.write_all(b"data")?;
    writer.write_all(&data_size.to_le_bytes())?;
    writer.write_all(pcm)?;
    Ok(())
}

/// Converts samples to little-endian 16-bit PCM, clipping to `[-1, 1]`.
pub fn samples_to_pcm16(samples: &[f32]) -> Vec<u8> {
    let mut pcm = Vec::with_capacity(samples.len() * 2);
    for &sample in samples {
        let value = (f64::from(sample).clamp(-1.0, 1.0) * 32767.0).round() as i16;
        pcm.extend_from_slice(&value.to_le_bytes());
    }
    pcm
}

/// Encoded WAV file plus its PCM hash.
#[derive(Debug, Clone)]
pub struct WavResult {
    /// Complete WAV file bytes.
    pub wav_data: Vec<u8>,
    /// BLAKE3 hash of the PCM payload only.
    pub pcm_hash: String,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Number of samples.
    pub num_samples: usize,
}

impl WavResult {
    /// Encodes a buffer.
    pub fn from_buffer(buffer: &AudioBuffer) -> Self {
        let pcm = samples_to_pcm16(&buffer.samples);
        let pcm_hash = blake3::hash(&pcm).to_hex().to_string();

        let mut wav_data = Vec::with_capacity(HEADER_LEN + pcm.len());
        // Writing into a Vec cannot fail
        let _ = write_wav(&mut wav_data, buffer.sample_rate, &pcm);

        Self {
            wav_data,
            pcm_hash,
            sample_rate: buffer.sample_rate,
            num_samples: buffer.len(),
        }
    }

    /// Duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.num_samples as f64 / f64::from(self.sample_rate)
    }

    /// Writes the file to disk.
    pub fn save(&self, path: impl AsRef<Path>) -> EngineResult<()> {
        let path = path.as_ref();
        fs::write(path, &self.wav_data)?;
        log::info!(
            target: "strumline::wav",
            "wrote {} samples to {}",
            self.num_samples,
            path.display()
        );
        Ok(())
    }
}

/// Returns the PCM payload of a WAV file, or `None` if it is malformed.
pub fn extract_pcm_data(wav_data: &[u8]) -> Option<&[u8]> {
    if wav_data.len() < HEADER_LEN || &wav_data[0..4] != b"RIFF" || &wav_data[8..12] != b"WAVE" {
        return None;
    }

    let mut pos = 12;
    while pos + 8 <= wav_data.len() {
        let chunk_id = &wav_data[pos..pos + 4];
        let size_bytes = [
            wav_data[pos + 4],
            wav_data[pos + 5],
            wav_data[pos + 6],
            wav_data[pos + 7],
        ];
        let chunk_size = u32::from_le_bytes(size_bytes) as usize;

        if chunk_id == b"data" {
            let start = pos + 8;
            return wav_data.get(start..start + chunk_size);
        }
        pos += 8 + chunk_size + chunk_size % 2;
    }
    None
}
