//! JSON manifest of a separation run

use crate::error::{Result, SplitError};
use crate::types::{ProcessedTrack, Stem};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

/// JSON output schema version
const SCHEMA_VERSION: &str = "1.0";

/// Top-level JSON output structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ManifestJson {
    /// Schema version for forward compatibility
    pub version: String,
    /// Run metadata
    pub metadata: ExportMetadata,
    /// Processed tracks
    pub tracks: Vec<TrackJson>,
}

/// Export metadata
#[derive(Debug, Serialize, Deserialize)]
pub struct ExportMetadata {
    /// stemsplit version that generated this file
    pub generator_version: String,
    /// Timestamp of export
    pub exported_at: String,
    /// Number of tracks
    pub track_count: usize,
}

/// JSON representation of one processed track
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackJson {
    /// Source file path
    pub path: String,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Duration in seconds
    pub duration_seconds: f64,
    /// Detected fundamental frequency in Hz
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pitch_hz: Option<f32>,
    /// Stem file paths
    pub stems: StemsJson,
    /// Timestamp of separation
    pub processed_at: String,
}

/// Stem paths, each present only when that stem was written to disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StemsJson {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drums: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bass: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vocals: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other: Option<String>,
}

/// Write the run manifest to a JSON file
///
/// Uses atomic write pattern: writes to a temp file first, then renames.
/// This prevents data corruption if the write is interrupted.
pub fn write_manifest(tracks: &[ProcessedTrack], output_path: &Path) -> Result<()> {
    // Temp file in the same directory so the rename stays on one filesystem
    let temp_path = output_path.with_extension("json.tmp");

    let file = File::create(&temp_path).map_err(|e| SplitError::OutputError {
        path: output_path.to_path_buf(),
        reason: format!("Failed to create temp file: {}", e),
    })?;

    let writer = BufWriter::new(file);

    let output = ManifestJson {
        version: SCHEMA_VERSION.to_string(),
        metadata: ExportMetadata {
            generator_version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: chrono::Utc::now().to_rfc3339(),
            track_count: tracks.len(),
        },
        tracks: tracks.iter().map(track_to_json).collect(),
    };

    serde_json::to_writer_pretty(writer, &output).map_err(|e| {
        let _ = std::fs::remove_file(&temp_path);
        SplitError::OutputError {
            path: output_path.to_path_buf(),
            reason: e.to_string(),
        }
    })?;

    // Atomic rename: either succeeds completely or leaves the target untouched
    std::fs::rename(&temp_path, output_path).map_err(|e| {
        let _ = std::fs::remove_file(&temp_path);
        SplitError::OutputError {
            path: output_path.to_path_buf(),
            reason: format!("Failed to finalize file: {}", e),
        }
    })?;

    info!("Wrote {} tracks to {}", tracks.len(), output_path.display());

    Ok(())
}

fn track_to_json(track: &ProcessedTrack) -> TrackJson {
    let stem_path = |stem: Stem| {
        track
            .written
            .contains(&stem)
            .then(|| track.stems.get(stem).to_string_lossy().to_string())
    };

    TrackJson {
        path: track.path.to_string_lossy().to_string(),
        sample_rate: track.sample_rate,
        duration_seconds: track.duration_seconds,
        pitch_hz: track.pitch_hz,
        stems: StemsJson {
            drums: stem_path(Stem::Drums),
            bass: stem_path(Stem::Bass),
            vocals: stem_path(Stem::Vocals),
            other: stem_path(Stem::Other),
        },
        processed_at: track.processed_at.to_rfc3339(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StemPaths;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn sample_track() -> ProcessedTrack {
        ProcessedTrack {
            path: PathBuf::from("/music/song.wav"),
            sample_rate: 44100,
            duration_seconds: 3.5,
            pitch_hz: Some(440.0),
            stems: StemPaths::for_input(Path::new("/music/song.wav"), Path::new("/out")),
            written: Stem::ALL.to_vec(),
            processed_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_round_trips_through_serde() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stemsplit.json");

        write_manifest(&[sample_track()], &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let parsed: ManifestJson = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed.version, "1.0");
        assert_eq!(parsed.metadata.track_count, 1);
        assert_eq!(parsed.tracks.len(), 1);
        assert_eq!(parsed.tracks[0].sample_rate, 44100);
        assert_eq!(parsed.tracks[0].pitch_hz, Some(440.0));
        let drums = parsed.tracks[0].stems.drums.as_deref().unwrap();
        assert!(drums.ends_with("song_drums.wav"));
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stemsplit.json");
        write_manifest(&[sample_track()], &path).unwrap();
        assert!(path.exists());
        assert!(!dir.path().join("stemsplit.json.tmp").exists());
    }

    #[test]
    fn test_unwritten_stems_omitted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stemsplit.json");
        let mut track = sample_track();
        track.written = vec![Stem::Bass, Stem::Vocals, Stem::Other];
        write_manifest(&[track], &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let parsed: ManifestJson = serde_json::from_str(&contents).unwrap();
        let stems = &parsed.tracks[0].stems;
        assert!(stems.drums.is_none());
        assert!(stems.bass.is_some());
        assert!(stems.vocals.is_some());
        assert!(stems.other.is_some());
        assert!(!contents.contains("drums"));
    }

    #[test]
    fn test_pitch_omitted_when_absent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stemsplit.json");
        let mut track = sample_track();
        track.pitch_hz = None;
        write_manifest(&[track], &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(!contents.contains("pitch_hz"));
    }
}
