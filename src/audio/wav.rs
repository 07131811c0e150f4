//! WAV encoding and reading
//!
//! The encoder writes the RIFF/WAVE PCM16 layout by hand: the output
//! byte stream is an external compatibility contract (any standard WAV
//! reader must parse it) and must be reproducible byte for byte, which
//! rules out delegating the header layout to a writer library. Reading
//! WAV input goes through hound.

use crate::error::{Result, SplitError};
use crate::types::SampleBuffer;
use std::path::Path;
use tracing::debug;

/// RIFF header plus fmt and data sub-chunk headers
const HEADER_BYTES: usize = 44;

/// Map a float sample in [-1, 1] to a signed 16-bit PCM value
///
/// Asymmetric scaling: negative samples use the full -32768 range,
/// positive samples top out at 32767. Out-of-range input is clamped
/// before conversion.
fn float_to_i16(sample: f32) -> i16 {
    let clamped = sample.clamp(-1.0, 1.0);
    if clamped < 0.0 {
        (clamped * 32768.0) as i16
    } else {
        (clamped * 32767.0) as i16
    }
}

/// Encode interleaved float samples as a PCM16 WAV byte stream
///
/// `samples` holds all channels interleaved; its length must be a
/// multiple of `channels`. The layout is little-endian throughout:
/// "RIFF", total size, "WAVE", a 16-byte "fmt " sub-chunk (PCM, channel
/// count, sample rate, byte rate, block align, 16 bits), then the
/// "data" sub-chunk.
pub fn encode(samples: &[f32], sample_rate: u32, channels: u16) -> Result<Vec<u8>> {
    if sample_rate == 0 {
        return Err(SplitError::invalid_argument("sample rate must be positive"));
    }
    if channels == 0 {
        return Err(SplitError::invalid_argument("channel count must be positive"));
    }
    if samples.len() % channels as usize != 0 {
        return Err(SplitError::invalid_argument(format!(
            "sample count {} is not a multiple of channel count {}",
            samples.len(),
            channels
        )));
    }

    let data_size = (samples.len() * 2) as u32;
    let byte_rate = sample_rate * channels as u32 * 2;
    let block_align = channels * 2;

    let mut bytes = Vec::with_capacity(HEADER_BYTES + samples.len() * 2);

    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(36 + data_size).to_le_bytes());
    bytes.extend_from_slice(b"WAVE");

    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
    bytes.extend_from_slice(&channels.to_le_bytes());
    bytes.extend_from_slice(&sample_rate.to_le_bytes());
    bytes.extend_from_slice(&byte_rate.to_le_bytes());
    bytes.extend_from_slice(&block_align.to_le_bytes());
    bytes.extend_from_slice(&16u16.to_le_bytes()); // bits per sample

    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&data_size.to_le_bytes());
    for &sample in samples {
        bytes.extend_from_slice(&float_to_i16(sample).to_le_bytes());
    }

    Ok(bytes)
}

/// Encode a mono buffer and write it to `path`
pub fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) -> Result<()> {
    let bytes = encode(samples, sample_rate, 1)?;
    std::fs::write(path, &bytes).map_err(|e| SplitError::output_error(path, e))?;
    debug!("wrote {} samples to {}", samples.len(), path.display());
    Ok(())
}

/// Read a WAV file to a mono SampleBuffer
///
/// Multi-channel input is mixed down by averaging the channels. Both
/// integer (up to 32-bit) and float sample formats are accepted.
pub fn read_mono(path: &Path) -> Result<SampleBuffer> {
    let reader = hound::WavReader::open(path)
        .map_err(|e| SplitError::decode_error(path, e.to_string()))?;
    let spec = reader.spec();

    debug!(
        "reading {} ({} Hz, {} channels, {}-bit {:?})",
        path.display(),
        spec.sample_rate,
        spec.channels,
        spec.bits_per_sample,
        spec.sample_format
    );

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<f32>, _>>()
            .map_err(|e| SplitError::decode_error(path, e.to_string()))?,
        hound::SampleFormat::Int => {
            let scale = 1.0 / (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(|e| SplitError::decode_error(path, e.to_string()))?
        }
    };

    if interleaved.is_empty() {
        return Err(SplitError::decode_error(path, "file contains no samples"));
    }

    let mono = to_mono(&interleaved, spec.channels as usize);
    Ok(SampleBuffer::new(mono, spec.sample_rate))
}

/// Convert interleaved multi-channel audio to mono by averaging
fn to_mono(samples: &[f32], channels: usize) -> Vec<f32> {
    if channels == 1 {
        return samples.to_vec();
    }

    samples
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}
