//! Separation engine
//!
//! Ties the stages together: segment and window the input, forward
//! transform each frame, mask into four stems, inverse transform, and
//! overlap-add each stem back into a full-length buffer.
//!
//! Frame processing has no cross-frame data dependency and runs on the
//! rayon pool. Overlap-add accumulation is sequential within a stem but
//! the four stems are independent and reconstructed concurrently. The
//! call is synchronous from the caller's perspective; the internal
//! parallelism is not part of the API contract.

use crate::dsp::frame::{segment, Frame};
use crate::dsp::transform::SpectralTransform;
use crate::dsp::window::hann;
use crate::error::{Result, SplitError};
use crate::separation::mask;
use crate::separation::reconstruct::OverlapAddReconstructor;
use crate::types::{SampleBuffer, SeparatedStems};
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, warn};

/// Default analysis frame size (~93ms at 44.1kHz)
pub const DEFAULT_FRAME_SIZE: usize = 4096;

/// Default hop between frames (75% overlap)
pub const DEFAULT_HOP_SIZE: usize = 1024;

/// Caller-owned configuration for one separation run
///
/// There is no process-wide state; every call receives its own config.
#[derive(Debug, Clone)]
pub struct SeparationConfig {
    /// Analysis window / FFT size in samples
    pub frame_size: usize,
    /// Hop between consecutive frames in samples
    pub hop_size: usize,
}

impl Default for SeparationConfig {
    fn default() -> Self {
        Self {
            frame_size: DEFAULT_FRAME_SIZE,
            hop_size: DEFAULT_HOP_SIZE,
        }
    }
}

impl SeparationConfig {
    pub fn new(frame_size: usize, hop_size: usize) -> Result<Self> {
        let config = Self {
            frame_size,
            hop_size,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.frame_size < 2 {
            return Err(SplitError::invalid_argument(format!(
                "frame size must be at least 2, got {}",
                self.frame_size
            )));
        }
        if self.hop_size == 0 || self.hop_size > self.frame_size {
            return Err(SplitError::invalid_argument(format!(
                "hop size must be in 1..={} (frame size), got {}",
                self.frame_size, self.hop_size
            )));
        }
        if self.hop_size > self.frame_size / 2 {
            // Hann overlap-add only reconstructs exactly at >= 50% overlap
            warn!(
                "hop size {} exceeds half the frame size {}; reconstruction will not be exact",
                self.hop_size, self.frame_size
            );
        }
        Ok(())
    }
}

/// Pipeline phase, for progress reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Analyze,
    Reconstruct,
    Write,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::Analyze => "analyzing",
            Phase::Reconstruct => "reconstructing",
            Phase::Write => "writing",
        }
    }
}

/// Injected progress sink
///
/// Receives (percent, phase) updates; implementations must be cheap and
/// non-blocking since they are called from worker threads.
pub trait ProgressObserver: Send + Sync {
    fn on_progress(&self, percent: f32, phase: Phase);
}

/// Observer that discards all updates
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&self, _percent: f32, _phase: Phase) {}
}

/// Separate a mono buffer into four stems
///
/// Stems are trimmed to the input length (the zero-padded analysis tail
/// is dropped). The buffer is copied into each stem; the input is never
/// mutated.
pub fn separate_buffer(
    buffer: &SampleBuffer,
    config: &SeparationConfig,
    progress: &dyn ProgressObserver,
) -> Result<SeparatedStems> {
    config.validate()?;

    if buffer.is_empty() {
        return Err(SplitError::DecodeFailure {
            reason: "input buffer is empty".to_string(),
        });
    }
    if buffer.sample_rate == 0 {
        return Err(SplitError::DecodeFailure {
            reason: "input buffer claims a zero sample rate".to_string(),
        });
    }

    let window = hann(config.frame_size)?;
    let transform = SpectralTransform::new(config.frame_size)?;

    let frames: Vec<Frame> = segment(&buffer.samples, config.frame_size, config.hop_size)?.collect();
    let total = frames.len();
    debug!(
        "separating {} samples at {} Hz into {} frames (frame {}, hop {})",
        buffer.len(),
        buffer.sample_rate,
        total,
        config.frame_size,
        config.hop_size
    );

    // Phase 1: per-frame forward transform, masking, inverse transform.
    // Frames are independent; order is preserved by the indexed collect.
    let done = AtomicUsize::new(0);
    let processed: Vec<[Vec<f32>; 4]> = frames
        .par_iter()
        .map(|frame| -> Result<[Vec<f32>; 4]> {
            let windowed: Vec<f32> = frame
                .samples
                .iter()
                .zip(window.iter())
                .map(|(&s, &w)| s * w)
                .collect();

            let spectrum = transform.forward(&windowed)?;
            let stems = mask::separate(&spectrum, buffer.sample_rate);

            let out = [
                transform.inverse(&stems.drums)?,
                transform.inverse(&stems.bass)?,
                transform.inverse(&stems.vocals)?,
                transform.inverse(&stems.other)?,
            ];

            let n = done.fetch_add(1, Ordering::Relaxed) + 1;
            if n % 16 == 0 || n == total {
                progress.on_progress(90.0 * n as f32 / total as f32, Phase::Analyze);
            }
            Ok(out)
        })
        .collect::<Result<Vec<_>>>()?;

    // Phase 2: overlap-add each stem. Accumulation into a stem's output
    // buffer is sequential; the four stems run concurrently.
    let reconstruct_stem = |stem_index: usize| -> Result<Vec<f32>> {
        let mut ola = OverlapAddReconstructor::new(config.frame_size, config.hop_size)?;
        for (i, stem_frames) in processed.iter().enumerate() {
            ola.push(i, &stem_frames[stem_index])?;
        }
        let mut out = ola.finish();
        out.truncate(buffer.len());
        Ok(out)
    };

    let ((drums, bass), (vocals, other)) = rayon::join(
        || (reconstruct_stem(0), reconstruct_stem(1)),
        || (reconstruct_stem(2), reconstruct_stem(3)),
    );
    let (drums, bass, vocals, other) = (drums?, bass?, vocals?, other?);

    progress.on_progress(100.0, Phase::Reconstruct);

    let sr = buffer.sample_rate;
    Ok(SeparatedStems {
        drums: SampleBuffer::new(drums, sr),
        bass: SampleBuffer::new(bass, sr),
        vocals: SampleBuffer::new(vocals, sr),
        other: SampleBuffer::new(other, sr),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Stem;
    use std::f32::consts::PI;

    fn sine_buffer(frequency: f32, sample_rate: u32, num_samples: usize) -> SampleBuffer {
        let samples: Vec<f32> = (0..num_samples)
            .map(|i| (2.0 * PI * frequency * i as f32 / sample_rate as f32).sin())
            .collect();
        SampleBuffer::new(samples, sample_rate)
    }

    #[test]
    fn test_config_validation() {
        assert!(SeparationConfig::new(4096, 1024).is_ok());
        assert!(SeparationConfig::new(1, 1).is_err());
        assert!(SeparationConfig::new(1024, 0).is_err());
        assert!(SeparationConfig::new(1024, 2048).is_err());
    }

    #[test]
    fn test_empty_buffer_rejected() {
        let buffer = SampleBuffer::new(vec![], 44100);
        let result = separate_buffer(&buffer, &SeparationConfig::default(), &NoProgress);
        assert!(matches!(result, Err(SplitError::DecodeFailure { .. })));
    }

    #[test]
    fn test_zero_sample_rate_rejected() {
        let buffer = SampleBuffer::new(vec![0.1; 8192], 0);
        let result = separate_buffer(&buffer, &SeparationConfig::default(), &NoProgress);
        assert!(matches!(result, Err(SplitError::DecodeFailure { .. })));
    }

    #[test]
    fn test_silence_yields_four_zero_stems() {
        let buffer = SampleBuffer::new(vec![0.0; 20000], 44100);
        let config = SeparationConfig::new(2048, 512).unwrap();
        let stems = separate_buffer(&buffer, &config, &NoProgress).unwrap();

        for stem in Stem::ALL {
            let buf = stems.get(stem);
            assert_eq!(buf.len(), 20000);
            assert!(
                buf.samples.iter().all(|s| s.abs() < 1e-6),
                "{} stem is not silent",
                stem
            );
        }
    }

    #[test]
    fn test_stems_match_input_length() {
        let buffer = sine_buffer(440.0, 44100, 12345);
        let config = SeparationConfig::new(1024, 256).unwrap();
        let stems = separate_buffer(&buffer, &config, &NoProgress).unwrap();
        for stem in Stem::ALL {
            assert_eq!(stems.get(stem).len(), 12345);
            assert_eq!(stems.get(stem).sample_rate, 44100);
        }
    }

    #[test]
    fn test_deterministic_across_runs() {
        let buffer = sine_buffer(220.0, 44100, 16384);
        let config = SeparationConfig::new(1024, 512).unwrap();
        let a = separate_buffer(&buffer, &config, &NoProgress).unwrap();
        let b = separate_buffer(&buffer, &config, &NoProgress).unwrap();
        for stem in Stem::ALL {
            assert_eq!(a.get(stem).samples, b.get(stem).samples);
        }
    }

    #[test]
    fn test_cola_reconstruction_without_masks() {
        // Forward-then-inverse each frame (no masking) and overlap-add:
        // the result must match the input within 1% RMS, edges excluded.
        let frame_size = 1024;
        let hop = frame_size / 2;
        let buffer = sine_buffer(440.0, 44100, 10 * frame_size);

        let window = hann(frame_size).unwrap();
        let transform = SpectralTransform::new(frame_size).unwrap();

        let mut ola = OverlapAddReconstructor::new(frame_size, hop).unwrap();
        for (i, frame) in segment(&buffer.samples, frame_size, hop)
            .unwrap()
            .enumerate()
        {
            let windowed: Vec<f32> = frame
                .samples
                .iter()
                .zip(window.iter())
                .map(|(&s, &w)| s * w)
                .collect();
            let spectrum = transform.forward(&windowed).unwrap();
            let restored = transform.inverse(&spectrum).unwrap();
            ola.push(i, &restored).unwrap();
        }

        let out = ola.finish();
        let lo = frame_size;
        let hi = buffer.len() - frame_size;

        let mut err_energy = 0.0f64;
        let mut sig_energy = 0.0f64;
        for i in lo..hi {
            let diff = (out[i] - buffer.samples[i]) as f64;
            err_energy += diff * diff;
            sig_energy += (buffer.samples[i] as f64).powi(2);
        }
        let rms_ratio = (err_energy / sig_energy).sqrt();
        assert!(rms_ratio < 0.01, "RMS error ratio {}", rms_ratio);
    }

    #[test]
    fn test_progress_reaches_completion() {
        use std::sync::Mutex;

        struct Capture(Mutex<Vec<(f32, Phase)>>);
        impl ProgressObserver for Capture {
            fn on_progress(&self, percent: f32, phase: Phase) {
                self.0.lock().unwrap().push((percent, phase));
            }
        }

        let observer = Capture(Mutex::new(Vec::new()));
        let buffer = sine_buffer(330.0, 44100, 32768);
        let config = SeparationConfig::new(2048, 512).unwrap();
        separate_buffer(&buffer, &config, &observer).unwrap();

        let events = observer.0.into_inner().unwrap();
        assert!(!events.is_empty());
        let (last_pct, last_phase) = events.last().copied().unwrap();
        assert_eq!(last_pct, 100.0);
        assert_eq!(last_phase, Phase::Reconstruct);
    }
}
