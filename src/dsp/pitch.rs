//! Autocorrelation pitch detection
//!
//! Estimates the fundamental frequency of a short time-domain buffer by
//! searching for the lag that maximizes the autocorrelation sum. Each
//! call is independent; callers wanting continuity or smoothing across
//! chunks must layer that themselves.

use crate::error::{Result, SplitError};
use tracing::trace;

/// Default lower frequency bound: E2, the lowest standard guitar string
pub const DEFAULT_MIN_FREQUENCY: f32 = 82.41;

/// Default upper frequency bound: E6, top of the vocal/guitar register
pub const DEFAULT_MAX_FREQUENCY: f32 = 1318.51;

/// Mean-absolute-amplitude gate below which a buffer is treated as silence
pub const SILENCE_THRESHOLD: f32 = 0.01;

/// Stateless autocorrelation pitch detector
#[derive(Debug, Clone)]
pub struct PitchDetector {
    min_frequency: f32,
    max_frequency: f32,
    silence_threshold: f32,
}

impl Default for PitchDetector {
    fn default() -> Self {
        Self {
            min_frequency: DEFAULT_MIN_FREQUENCY,
            max_frequency: DEFAULT_MAX_FREQUENCY,
            silence_threshold: SILENCE_THRESHOLD,
        }
    }
}

impl PitchDetector {
    /// Create a detector with custom frequency bounds in Hz
    pub fn new(min_frequency: f32, max_frequency: f32) -> Result<Self> {
        if !(min_frequency > 0.0 && max_frequency > min_frequency) {
            return Err(SplitError::invalid_argument(format!(
                "pitch bounds must satisfy 0 < min < max, got {}..{}",
                min_frequency, max_frequency
            )));
        }
        Ok(Self {
            min_frequency,
            max_frequency,
            silence_threshold: SILENCE_THRESHOLD,
        })
    }

    /// Estimate the fundamental frequency of `samples`
    ///
    /// Returns `Ok(None)` when the buffer is too quiet for a reliable
    /// estimate or when the best autocorrelation lag falls outside the
    /// configured bounds.
    pub fn detect(&self, samples: &[f32], sample_rate: u32) -> Result<Option<f32>> {
        if samples.is_empty() {
            return Err(SplitError::invalid_argument(
                "cannot detect pitch of an empty buffer",
            ));
        }
        if sample_rate == 0 {
            return Err(SplitError::invalid_argument("sample rate must be positive"));
        }

        // Silence gate: too quiet to estimate reliably
        let mean_abs = samples.iter().map(|s| s.abs()).sum::<f32>() / samples.len() as f32;
        if mean_abs < self.silence_threshold {
            trace!("pitch: silence gate hit (mean abs {:.4})", mean_abs);
            return Ok(None);
        }

        let sr = sample_rate as f32;
        let min_lag = ((sr / self.max_frequency).floor() as usize).max(1);
        let max_lag = ((sr / self.min_frequency).ceil() as usize).min(samples.len() - 1);

        if min_lag >= max_lag {
            // Buffer shorter than one period of the lowest detectable pitch
            return Ok(None);
        }

        let mut best_lag = 0usize;
        let mut best_sum = f32::NEG_INFINITY;

        for lag in min_lag..=max_lag {
            let mut sum = 0.0f32;
            for i in 0..samples.len() - lag {
                sum += samples[i] * samples[i + lag];
            }
            if sum > best_sum {
                best_sum = sum;
                best_lag = lag;
            }
        }

        if best_lag == 0 {
            return Ok(None);
        }

        let frequency = sr / best_lag as f32;
        if frequency < self.min_frequency || frequency > self.max_frequency {
            trace!("pitch: best lag {} maps outside bounds", best_lag);
            return Ok(None);
        }

        Ok(Some(frequency))
    }
}
