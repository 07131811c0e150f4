//! Runtime configuration settings

use crate::separation::engine::{DEFAULT_FRAME_SIZE, DEFAULT_HOP_SIZE};
use std::path::PathBuf;

/// Runtime settings for the separation pipeline
#[derive(Debug, Clone)]
pub struct Settings {
    /// Input path (file or directory)
    pub input: PathBuf,
    /// Output directory
    pub output: PathBuf,
    /// Analysis frame size in samples
    pub frame_size: usize,
    /// Hop between frames in samples
    pub hop_size: usize,
    /// Number of worker threads
    pub threads: usize,
    /// Scan recursively
    pub recursive: bool,
    /// Peak-normalize stems before writing
    pub normalize: bool,
    /// Write the JSON manifest
    pub output_json: bool,
    /// Show progress bars
    pub show_progress: bool,
}

impl Settings {
    /// Create settings from CLI arguments
    pub fn from_cli(cli: &super::cli::Cli) -> Self {
        let default_threads = num_cpus::get().saturating_sub(1).max(1);

        Self {
            input: cli.input.clone(),
            output: cli.output.clone(),
            frame_size: cli.frame_size,
            hop_size: cli.hop_size,
            threads: cli.threads.unwrap_or(default_threads),
            recursive: cli.recursive,
            normalize: !cli.no_normalize,
            output_json: !cli.no_json,
            show_progress: !cli.quiet,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input: PathBuf::from("."),
            output: PathBuf::from("./stems"),
            frame_size: DEFAULT_FRAME_SIZE,
            hop_size: DEFAULT_HOP_SIZE,
            threads: num_cpus::get().saturating_sub(1).max(1),
            recursive: false,
            normalize: true,
            output_json: true,
            show_progress: true,
        }
    }
}
