//! CLI argument parsing

use clap::Parser;
use std::path::PathBuf;

/// stemsplit - Frequency-band stem separation for audio files
///
/// Splits WAV files into four stems (drums, bass, vocals, other) using
/// short-time spectral masking, and reports detected pitch. Outputs one
/// WAV per stem plus a JSON manifest.
#[derive(Parser, Debug)]
#[command(name = "stemsplit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Input path (WAV file or directory)
    #[arg(short, long, value_name = "PATH")]
    pub input: PathBuf,

    /// Output directory for stem WAVs and the manifest
    #[arg(short, long, value_name = "DIR")]
    pub output: PathBuf,

    /// Analysis frame size in samples (power of two recommended)
    #[arg(long, value_name = "N", default_value = "4096")]
    pub frame_size: usize,

    /// Hop between analysis frames in samples
    #[arg(long, value_name = "N", default_value = "1024")]
    pub hop_size: usize,

    /// Number of worker threads (defaults to CPU count - 1)
    #[arg(short = 'j', long, value_name = "N")]
    pub threads: Option<usize>,

    /// Scan subdirectories recursively
    #[arg(short, long, default_value = "false")]
    pub recursive: bool,

    /// Disable peak normalization of output stems
    #[arg(long, default_value = "false")]
    pub no_normalize: bool,

    /// Skip writing the JSON manifest
    #[arg(long, default_value = "false")]
    pub no_json: bool,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress progress bars)
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}
