//! Core data types for stemsplit
//!
//! These types represent the domain model and flow through the pipeline.
//! Buffers are value-like: each stage owns its copy, nothing is aliased
//! across stage boundaries.

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

// =============================================================================
// Sample buffers
// =============================================================================

/// Decoded mono audio samples ready for separation
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    /// Mono samples, nominally in [-1.0, 1.0]
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Duration in seconds
    pub duration: f64,
}

impl SampleBuffer {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        // Guard against division by zero - use 0 duration for invalid sample rate
        let duration = if sample_rate > 0 {
            samples.len() as f64 / sample_rate as f64
        } else {
            0.0
        };
        Self {
            samples,
            sample_rate,
            duration,
        }
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

// =============================================================================
// Stems
// =============================================================================

/// The four separation targets
///
/// A fixed sum type rather than string keys, so matches over stems are
/// checked exhaustively at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stem {
    Drums,
    Bass,
    Vocals,
    Other,
}

impl Stem {
    /// All stems, in mask-table order
    pub const ALL: [Stem; 4] = [Stem::Drums, Stem::Bass, Stem::Vocals, Stem::Other];

    /// Lowercase label used in filenames and logs
    pub fn label(self) -> &'static str {
        match self {
            Stem::Drums => "drums",
            Stem::Bass => "bass",
            Stem::Vocals => "vocals",
            Stem::Other => "other",
        }
    }
}

impl std::fmt::Display for Stem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Paths to the four stem files for one track
#[derive(Debug, Clone)]
pub struct StemPaths {
    pub drums: PathBuf,
    pub bass: PathBuf,
    pub vocals: PathBuf,
    pub other: PathBuf,
}

impl StemPaths {
    /// Derive stem paths `<basename>_<stem>.wav` in `output_dir`
    pub fn for_input(input: &Path, output_dir: &Path) -> Self {
        let base = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("track");

        let path_for = |stem: Stem| output_dir.join(format!("{}_{}.wav", base, stem.label()));

        Self {
            drums: path_for(Stem::Drums),
            bass: path_for(Stem::Bass),
            vocals: path_for(Stem::Vocals),
            other: path_for(Stem::Other),
        }
    }

    pub fn get(&self, stem: Stem) -> &Path {
        match stem {
            Stem::Drums => &self.drums,
            Stem::Bass => &self.bass,
            Stem::Vocals => &self.vocals,
            Stem::Other => &self.other,
        }
    }
}

/// Four reconstructed sample buffers, one per stem
#[derive(Debug, Clone)]
pub struct SeparatedStems {
    pub drums: SampleBuffer,
    pub bass: SampleBuffer,
    pub vocals: SampleBuffer,
    pub other: SampleBuffer,
}

impl SeparatedStems {
    pub fn get(&self, stem: Stem) -> &SampleBuffer {
        match stem {
            Stem::Drums => &self.drums,
            Stem::Bass => &self.bass,
            Stem::Vocals => &self.vocals,
            Stem::Other => &self.other,
        }
    }

    pub fn get_mut(&mut self, stem: Stem) -> &mut SampleBuffer {
        match stem {
            Stem::Drums => &mut self.drums,
            Stem::Bass => &mut self.bass,
            Stem::Vocals => &mut self.vocals,
            Stem::Other => &mut self.other,
        }
    }

}

/// One reconstructed stem plus its provenance metadata
#[derive(Debug, Clone)]
pub struct StemTrack {
    pub stem: Stem,
    pub buffer: SampleBuffer,
    /// Source file the stem was separated from
    pub source: PathBuf,
    /// Timestamp of separation
    pub processed_at: DateTime<Utc>,
}

// =============================================================================
// Pipeline records
// =============================================================================

/// Record of one processed input file, for the run manifest
#[derive(Debug, Clone)]
pub struct ProcessedTrack {
    pub path: PathBuf,
    pub sample_rate: u32,
    pub duration_seconds: f64,
    /// Detected fundamental frequency, None for silence or out-of-range
    pub pitch_hz: Option<f32>,
    pub stems: StemPaths,
    /// Stems confirmed on disk; a stem whose write failed is absent
    pub written: Vec<Stem>,
    pub processed_at: DateTime<Utc>,
}
