//! Unified error types for stemsplit
//!
//! Error strategy:
//! - Per-file errors (unreadable input, malformed WAV): recoverable, skip and continue
//! - Per-stem write errors: reported per stem; one failed stem never blocks the others
//! - Configuration errors: fatal, surfaced to the caller immediately
//!
//! No error is retried internally; transient I/O failures are the caller's to retry.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for stemsplit operations
#[derive(Debug, Error)]
pub enum SplitError {
    // =========================================================================
    // Configuration errors - always surfaced synchronously, never retried
    // =========================================================================
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    // =========================================================================
    // Recoverable errors - skip file, continue batch
    // =========================================================================
    #[error("Failed to read audio input: {reason}")]
    DecodeFailure { reason: String },

    #[error("Failed to read audio file '{path}': {reason}\n  Tip: Only uncompressed PCM WAV input is supported")]
    DecodeError { path: PathBuf, reason: String },

    #[error("File not found: '{0}'\n  Tip: Check the path exists and is accessible")]
    FileNotFound(PathBuf),

    #[error("Unsupported audio format for '{path}': {format}\n  Supported format: WAV")]
    UnsupportedFormat { path: PathBuf, format: String },

    // =========================================================================
    // Fatal errors - abort entire batch
    // =========================================================================
    #[error("Cannot write output to '{path}': {reason}\n  Tip: Check write permissions for the output directory")]
    OutputError { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for stemsplit operations
pub type Result<T> = std::result::Result<T, SplitError>;

impl SplitError {
    /// Returns true if this error is recoverable (should skip file, continue batch)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SplitError::DecodeFailure { .. }
                | SplitError::DecodeError { .. }
                | SplitError::FileNotFound(_)
                | SplitError::UnsupportedFormat { .. }
        )
    }

    /// Create an invalid-argument error
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        SplitError::InvalidArgument(reason.into())
    }

    /// Create a decode error with file context
    pub fn decode_error(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        SplitError::DecodeError {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an output error, checking for common issues
    pub fn output_error(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        let reason = match err.kind() {
            std::io::ErrorKind::PermissionDenied => {
                format!(
                    "Permission denied. Check that you have write access to {}",
                    path.display()
                )
            }
            std::io::ErrorKind::NotFound => {
                format!(
                    "Directory does not exist: {}",
                    path.parent()
                        .map(|p| p.display().to_string())
                        .unwrap_or_default()
                )
            }
            _ => err.to_string(),
        };
        SplitError::OutputError { path, reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_errors_are_recoverable() {
        let err = SplitError::decode_error("/tmp/x.wav", "truncated header");
        assert!(err.is_recoverable());

        let err = SplitError::FileNotFound(PathBuf::from("/missing.wav"));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_config_errors_are_fatal() {
        let err = SplitError::invalid_argument("hop size exceeds frame size");
        assert!(!err.is_recoverable());

        let err = SplitError::OutputError {
            path: PathBuf::from("/out"),
            reason: "disk full".to_string(),
        };
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_output_error_permission_denied() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = SplitError::output_error("/protected/stem.wav", io);
        assert!(err.to_string().contains("Permission denied"));
    }
}
