//! Windowed overlap-add reconstruction
//!
//! Reassembles inverse-transformed frames into a continuous sample
//! stream. Each pushed frame is multiplied by the synthesis window and
//! accumulated at `frame_index * hop`; overlapping regions add. A
//! running window-squared sum is kept and divided out at the end, so an
//! analysis/synthesis Hann pair at hop <= frame_size/2 reconstructs the
//! input with unity gain (edges excepted, where the window sum is small).

use crate::dsp::window::hann;
use crate::error::{Result, SplitError};

/// Accumulates windowed frames into one output buffer
///
/// Accumulation is additive into shared per-stem buffers and therefore
/// sequential per reconstructor; independent stems each get their own
/// reconstructor and may run concurrently.
#[derive(Debug, Clone)]
pub struct OverlapAddReconstructor {
    frame_size: usize,
    hop_size: usize,
    window: Vec<f32>,
    output: Vec<f32>,
    window_sum: Vec<f32>,
    frames_pushed: usize,
}

impl OverlapAddReconstructor {
    pub fn new(frame_size: usize, hop_size: usize) -> Result<Self> {
        let window = hann(frame_size)?;
        if hop_size == 0 || hop_size > frame_size {
            return Err(SplitError::invalid_argument(format!(
                "hop size must be in 1..={} (frame size), got {}",
                frame_size, hop_size
            )));
        }
        Ok(Self {
            frame_size,
            hop_size,
            window,
            output: Vec::new(),
            window_sum: Vec::new(),
            frames_pushed: 0,
        })
    }

    /// Add one frame's contribution at `frame_index * hop`
    ///
    /// Frames may arrive in any order; the output position depends only
    /// on the index.
    pub fn push(&mut self, frame_index: usize, samples: &[f32]) -> Result<()> {
        if samples.len() != self.frame_size {
            return Err(SplitError::invalid_argument(format!(
                "frame length {} does not match reconstructor frame size {}",
                samples.len(),
                self.frame_size
            )));
        }

        let start = frame_index * self.hop_size;
        let end = start + self.frame_size;
        if self.output.len() < end {
            self.output.resize(end, 0.0);
            self.window_sum.resize(end, 0.0);
        }

        for (i, (&s, &w)) in samples.iter().zip(self.window.iter()).enumerate() {
            self.output[start + i] += s * w;
            self.window_sum[start + i] += w * w;
        }
        self.frames_pushed += 1;
        Ok(())
    }

    /// Number of frames accumulated so far
    pub fn frames_pushed(&self) -> usize {
        self.frames_pushed
    }

    /// Normalize by the window-squared sum and return the buffer
    ///
    /// Output length is `(frames - 1) * hop + frame_size` when frames
    /// were pushed with consecutive indices from zero.
    pub fn finish(mut self) -> Vec<f32> {
        for (sample, &ws) in self.output.iter_mut().zip(self.window_sum.iter()) {
            if ws > 1e-8 {
                *sample /= ws;
            }
        }
        self.output
    }
}
