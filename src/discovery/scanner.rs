//! Filesystem scanning for WAV input

use crate::error::{Result, SplitError};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Discovered input file
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    pub path: PathBuf,
}

/// Scan a path (file or directory) for WAV files
///
/// A single-file input must be a WAV; a directory is walked (one level
/// deep unless `recursive`) and non-WAV entries are silently ignored.
pub fn scan(input: &Path, recursive: bool) -> Result<Vec<DiscoveredFile>> {
    if !input.exists() {
        return Err(SplitError::FileNotFound(input.to_path_buf()));
    }

    let mut files = Vec::new();

    if input.is_file() {
        // Single file mode
        if let Some(file) = try_discover_file(input) {
            files.push(file);
        } else {
            return Err(SplitError::UnsupportedFormat {
                path: input.to_path_buf(),
                format: input
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("unknown")
                    .to_string(),
            });
        }
    } else if input.is_dir() {
        // Directory mode
        let walker = if recursive {
            WalkDir::new(input)
        } else {
            WalkDir::new(input).max_depth(1)
        };

        for entry in walker.into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            if path.is_file() {
                if let Some(file) = try_discover_file(path) {
                    debug!("Discovered: {}", file.path.display());
                    files.push(file);
                }
            }
        }
        // Deterministic processing order regardless of directory iteration
        files.sort_by(|a, b| a.path.cmp(&b.path));
    }

    info!("Discovered {} WAV files", files.len());

    if files.is_empty() {
        warn!("No WAV files found in {}", input.display());
    }

    Ok(files)
}

/// Try to create a DiscoveredFile if the path is a WAV file
fn try_discover_file(path: &Path) -> Option<DiscoveredFile> {
    let ext = path.extension()?.to_str()?;
    if !ext.eq_ignore_ascii_case("wav") {
        return None;
    }

    Some(DiscoveredFile {
        path: path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_path() {
        let result = scan(Path::new("/nonexistent/definitely/missing"), false);
        assert!(matches!(result, Err(SplitError::FileNotFound(_))));
    }

    #[test]
    fn test_single_non_wav_file_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello").unwrap();
        let result = scan(&path, false);
        assert!(matches!(result, Err(SplitError::UnsupportedFormat { .. })));
    }

    #[test]
    fn test_directory_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("b.wav"), [0u8; 4]).unwrap();
        std::fs::write(dir.path().join("a.WAV"), [0u8; 4]).unwrap();
        std::fs::write(dir.path().join("c.mp3"), [0u8; 4]).unwrap();

        let files = scan(dir.path(), false).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files[0].path.ends_with("a.WAV"));
        assert!(files[1].path.ends_with("b.wav"));
    }

    #[test]
    fn test_non_recursive_skips_subdirectories() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("nested");
        std::fs::create_dir(&sub).unwrap();
        std::fs::write(dir.path().join("top.wav"), [0u8; 4]).unwrap();
        std::fs::write(sub.join("deep.wav"), [0u8; 4]).unwrap();

        let flat = scan(dir.path(), false).unwrap();
        assert_eq!(flat.len(), 1);

        let deep = scan(dir.path(), true).unwrap();
        assert_eq!(deep.len(), 2);
    }
}
