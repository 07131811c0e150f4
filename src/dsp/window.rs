//! Analysis window generation

use crate::error::{Result, SplitError};

/// Generate a symmetric Hann window of the given size
///
/// `w[i] = 0.5 * (1 - cos(2*pi*i / (size - 1)))`, zero at both endpoints.
/// A window of fewer than two samples is degenerate and rejected.
pub fn hann(size: usize) -> Result<Vec<f32>> {
    if size < 2 {
        return Err(SplitError::invalid_argument(format!(
            "window size must be at least 2, got {}",
            size
        )));
    }

    use std::f32::consts::PI;
    let denom = (size - 1) as f32;
    Ok((0..size)
        .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f32 / denom).cos()))
        .collect())
}
