//! Frame segmentation
//!
//! Slices a sample buffer into overlapping fixed-size frames at a fixed
//! hop. Frames are produced lazily; the iterator borrows the buffer and
//! never mutates it, so cloning the iterator restarts the sequence.

use crate::error::{Result, SplitError};

/// A fixed-length extract of a sample buffer
///
/// `offset` is the frame's start position in the original buffer. The
/// final frame of a sequence may be zero-padded; `samples` always has
/// the full frame length.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub offset: usize,
    pub samples: Vec<f32>,
}

/// Segment a buffer into overlapping frames
///
/// Frames start at offsets `0, hop, 2*hop, ...` while a full frame fits.
/// Any leftover samples are emitted in one final zero-padded frame, so
/// every input sample is represented in at least one frame.
pub fn segment(samples: &[f32], frame_size: usize, hop_size: usize) -> Result<FrameIter<'_>> {
    if samples.is_empty() {
        return Err(SplitError::invalid_argument("cannot segment an empty buffer"));
    }
    if frame_size == 0 {
        return Err(SplitError::invalid_argument("frame size must be positive"));
    }
    if hop_size == 0 || hop_size > frame_size {
        return Err(SplitError::invalid_argument(format!(
            "hop size must be in 1..={} (frame size), got {}",
            frame_size, hop_size
        )));
    }

    Ok(FrameIter {
        samples,
        frame_size,
        hop_size,
        offset: 0,
        covered: 0,
        done: false,
    })
}

/// Lazy, restartable frame sequence over a borrowed buffer
#[derive(Debug, Clone)]
pub struct FrameIter<'a> {
    samples: &'a [f32],
    frame_size: usize,
    hop_size: usize,
    offset: usize,
    covered: usize,
    done: bool,
}

impl Iterator for FrameIter<'_> {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        if self.done {
            return None;
        }

        let len = self.samples.len();

        if self.offset + self.frame_size <= len {
            let frame = Frame {
                offset: self.offset,
                samples: self.samples[self.offset..self.offset + self.frame_size].to_vec(),
            };
            self.covered = self.offset + self.frame_size;
            self.offset += self.hop_size;
            return Some(frame);
        }

        self.done = true;

        // Tail frame only when earlier frames left samples uncovered
        if self.covered < len {
            let mut samples = self.samples[self.offset..].to_vec();
            samples.resize(self.frame_size, 0.0);
            return Some(Frame {
                offset: self.offset,
                samples,
            });
        }

        None
    }
}
