//! stemsplit - Frequency-Band Stem Separation Engine
//!
//! A command-line utility and library for splitting WAV files into four
//! stems (drums, bass, vocals, other) with short-time spectral masking,
//! plus autocorrelation pitch detection. Outputs one WAV per stem and a
//! JSON manifest of the run.
//!
//! # Architecture
//!
//! The library is organized into several key modules:
//!
//! - `config`: CLI argument parsing and runtime settings
//! - `discovery`: WAV file scanning
//! - `audio`: WAV reading, byte-exact PCM16 encoding, peak normalization
//! - `dsp`: Windowing, frame segmentation, FFT, pitch detection
//! - `separation`: Spectral masking and overlap-add reconstruction
//! - `pipeline`: Batch orchestration with a dedicated stem writer thread
//! - `export`: JSON manifest output
//!
//! # Example
//!
//! ```no_run
//! use stemsplit::separation::engine::{separate_buffer, NoProgress, SeparationConfig};
//! use stemsplit::types::SampleBuffer;
//!
//! let buffer = SampleBuffer::new(vec![0.0; 44100], 44100);
//! let stems = separate_buffer(&buffer, &SeparationConfig::default(), &NoProgress)
//!     .expect("separation failed");
//! println!("drums stem: {} samples", stems.drums.len());
//! ```

pub mod audio;
pub mod config;
pub mod discovery;
pub mod dsp;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod separation;
pub mod types;

// Re-export key types at crate root
pub use error::{Result, SplitError};
pub use types::{SampleBuffer, SeparatedStems, Stem, StemPaths};
