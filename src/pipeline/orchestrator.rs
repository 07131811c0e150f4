//! Pipeline orchestration
//!
//! Coordinates file discovery, separation, stem writing, and manifest
//! export. Separation itself is frame-parallel on the rayon pool, so
//! input files run through the pipeline one at a time; stem WAV writing
//! happens on a dedicated worker thread behind a bounded channel so disk
//! I/O overlaps with the next file's analysis.

use crate::audio;
use crate::config::Settings;
use crate::discovery::{self, DiscoveredFile};
use crate::dsp::PitchDetector;
use crate::error::{Result, SplitError};
use crate::export;
use crate::separation::engine::{
    separate_buffer, Phase, ProgressObserver, SeparationConfig,
};
use crate::types::{ProcessedTrack, SampleBuffer, SeparatedStems, Stem, StemPaths, StemTrack};
use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::path::PathBuf;
use std::thread;
use tracing::{debug, error, info, warn};

/// Pipeline result summary
#[derive(Debug)]
pub struct PipelineResult {
    pub total_files: usize,
    /// Tracks with all four stems on disk
    pub successful: usize,
    /// Tracks that produced no output at all
    pub failed: usize,
    pub skipped: usize,
    /// Tracks where some stems were written and some were not
    pub partial: Vec<StemWriteReport>,
}

/// Per-stem write outcome for a track with at least one failed stem
#[derive(Debug)]
pub struct StemWriteReport {
    pub source: PathBuf,
    pub written: Vec<Stem>,
    pub failed: Vec<Stem>,
}

/// Job for the stem writer thread
struct WriteJob {
    track: StemTrack,
    output_path: PathBuf,
}

/// Outcome of one stem write
struct WriteOutcome {
    source: PathBuf,
    stem: Stem,
    result: Result<()>,
}

/// Writer channel capacity. Bounded so a slow disk applies backpressure
/// to analysis instead of letting stem buffers pile up in memory.
const WRITE_CHANNEL_CAPACITY: usize = 8;

/// Run the full separation pipeline
pub fn run(settings: &Settings) -> Result<PipelineResult> {
    use std::time::Instant;

    let pipeline_start = Instant::now();

    configure_thread_pool(settings.threads)?;

    let config = SeparationConfig::new(settings.frame_size, settings.hop_size)?;

    // Phase 1: Discovery
    info!("Scanning for WAV files...");
    let files = discovery::scan(&settings.input, settings.recursive)?;

    if files.is_empty() {
        return Ok(PipelineResult {
            total_files: 0,
            successful: 0,
            failed: 0,
            skipped: 0,
            partial: Vec::new(),
        });
    }

    std::fs::create_dir_all(&settings.output).map_err(|e| SplitError::OutputError {
        path: settings.output.clone(),
        reason: e.to_string(),
    })?;

    // Phase 2: Separation, with stem writes on a dedicated thread
    let (job_tx, job_rx) = bounded::<WriteJob>(WRITE_CHANNEL_CAPACITY);
    // Unbounded so the writer never blocks on reporting while the main
    // thread is blocked joining it.
    let (outcome_tx, outcome_rx) = unbounded::<WriteOutcome>();

    let writer_handle = thread::spawn(move || writer_worker(job_rx, outcome_tx));

    let progress_bar = if settings.show_progress {
        let pb = ProgressBar::new(files.len() as u64 * 100);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    let mut skipped = 0usize;
    let mut failed = 0usize;
    let mut candidates: Vec<ProcessedTrack> = Vec::new();

    for (index, file) in files.iter().enumerate() {
        let observer = BarObserver {
            bar: progress_bar.as_ref(),
            base: index as u64 * 100,
        };
        if let Some(ref pb) = progress_bar {
            pb.set_message(
                file.path
                    .file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
                    .to_string(),
            );
        }

        match process_file(file, settings, &config, &observer, &job_tx) {
            Ok(track) => candidates.push(track),
            Err(e) if e.is_recoverable() => {
                warn!("Skipping {}: {}", file.path.display(), e);
                skipped += 1;
            }
            Err(e) => {
                error!("Failed {}: {}", file.path.display(), e);
                failed += 1;
            }
        }

        if let Some(ref pb) = progress_bar {
            pb.set_position((index as u64 + 1) * 100);
        }
    }

    // Close the job channel and wait for all pending writes
    drop(job_tx);
    if writer_handle.join().is_err() {
        error!("Stem writer thread panicked; some stems may be missing");
    }

    // Collect per-stem write outcomes. One failed stem never affects
    // other tracks or the sibling stems already on disk.
    let mut write_results: HashMap<PathBuf, (Vec<Stem>, Vec<Stem>)> = HashMap::new();
    for outcome in outcome_rx {
        let entry = write_results.entry(outcome.source.clone()).or_default();
        match outcome.result {
            Ok(()) => entry.0.push(outcome.stem),
            Err(e) => {
                warn!(
                    "Failed to write {} stem for {}: {}",
                    outcome.stem,
                    outcome.source.display(),
                    e
                );
                entry.1.push(outcome.stem);
            }
        }
    }

    // Tracks with every stem written count as successful; a track with a
    // mix of written and failed stems is reported as partial and stays in
    // the manifest with the stems that made it to disk.
    let mut successful = 0usize;
    let mut partial: Vec<StemWriteReport> = Vec::new();
    let mut tracks: Vec<ProcessedTrack> = Vec::new();
    for mut track in candidates {
        // No outcomes at all means the writer thread died mid-run
        let Some((written, missing)) = write_results.remove(&track.path) else {
            error!("{}: no write outcomes recorded", track.path.display());
            failed += 1;
            continue;
        };
        if missing.is_empty() {
            successful += 1;
            tracks.push(track);
        } else if written.is_empty() {
            error!("{}: no stems could be written", track.path.display());
            failed += 1;
        } else {
            let names: Vec<&str> = missing.iter().map(|s| s.label()).collect();
            error!(
                "{}: stems not written: {}",
                track.path.display(),
                names.join(", ")
            );
            track.written = written.clone();
            tracks.push(track.clone());
            partial.push(StemWriteReport {
                source: track.path,
                written,
                failed: missing,
            });
        }
    }

    if let Some(pb) = progress_bar {
        pb.finish_with_message("Separation complete");
    }

    // Phase 3: Manifest
    if settings.output_json && !tracks.is_empty() {
        let manifest_path = settings.output.join("stemsplit.json");
        export::write_manifest(&tracks, &manifest_path)?;
    }

    info!(
        "Total pipeline time: {:.2}s",
        pipeline_start.elapsed().as_secs_f64()
    );

    Ok(PipelineResult {
        total_files: files.len(),
        successful,
        failed,
        skipped,
        partial,
    })
}

/// Separate one file and queue its four stems for writing
fn process_file(
    file: &DiscoveredFile,
    settings: &Settings,
    config: &SeparationConfig,
    observer: &dyn ProgressObserver,
    job_tx: &Sender<WriteJob>,
) -> Result<ProcessedTrack> {
    debug!("Processing: {}", file.path.display());

    let buffer = audio::read_mono(&file.path)?;

    let pitch = PitchDetector::default().detect(pitch_window(&buffer), buffer.sample_rate)?;
    if let Some(hz) = pitch {
        debug!("Detected pitch {:.1} Hz for {}", hz, file.path.display());
    }

    let mut stems = separate_buffer(&buffer, config, observer)?;

    if settings.normalize {
        for stem in Stem::ALL {
            audio::normalize(&mut stems.get_mut(stem).samples);
        }
    }

    let paths = StemPaths::for_input(&file.path, &settings.output);
    let processed_at = chrono::Utc::now();

    observer.on_progress(100.0, Phase::Write);
    let SeparatedStems {
        drums,
        bass,
        vocals,
        other,
    } = stems;
    for (stem, buffer) in Stem::ALL.into_iter().zip([drums, bass, vocals, other]) {
        let job = WriteJob {
            track: StemTrack {
                stem,
                buffer,
                source: file.path.clone(),
                processed_at,
            },
            output_path: paths.get(stem).to_path_buf(),
        };
        if job_tx.send(job).is_err() {
            return Err(SplitError::output_error(
                paths.get(stem),
                std::io::Error::other("stem writer thread is gone"),
            ));
        }
    }

    Ok(ProcessedTrack {
        path: file.path.clone(),
        sample_rate: buffer.sample_rate,
        duration_seconds: buffer.duration,
        pitch_hz: pitch,
        stems: paths,
        written: Stem::ALL.to_vec(),
        processed_at,
    })
}

/// Seconds of audio the pitch detector looks at
const PITCH_WINDOW_SECS: f32 = 1.0;

/// Centered slice of the track for pitch analysis
///
/// Autocorrelation cost grows with buffer length; one second from the
/// middle of the track (past any fade-in) is plenty for a stable
/// estimate.
fn pitch_window(buffer: &SampleBuffer) -> &[f32] {
    let window_len = (buffer.sample_rate as f32 * PITCH_WINDOW_SECS) as usize;
    if window_len == 0 || buffer.len() <= window_len {
        return &buffer.samples;
    }
    let start = (buffer.len() - window_len) / 2;
    &buffer.samples[start..start + window_len]
}

/// Worker thread draining stem write jobs
///
/// Each stem is written independently; a failure is reported on the
/// outcome channel and the worker moves on to the next job.
fn writer_worker(rx: Receiver<WriteJob>, tx: Sender<WriteOutcome>) {
    for job in rx {
        let buffer = &job.track.buffer;
        let result = audio::write_wav(&job.output_path, &buffer.samples, buffer.sample_rate);
        if result.is_ok() {
            debug!(
                "Wrote {} ({:.1}s)",
                job.output_path.display(),
                buffer.duration
            );
        }

        let outcome = WriteOutcome {
            source: job.track.source,
            stem: job.track.stem,
            result,
        };
        if tx.send(outcome).is_err() {
            // Receiver dropped, we're shutting down
            break;
        }
    }
}

/// Progress observer that drives an overall indicatif bar
///
/// Each file owns a 100-unit slice of the bar; per-file percent maps
/// into that slice.
struct BarObserver<'a> {
    bar: Option<&'a ProgressBar>,
    base: u64,
}

impl ProgressObserver for BarObserver<'_> {
    fn on_progress(&self, percent: f32, _phase: Phase) {
        if let Some(bar) = self.bar {
            bar.set_position(self.base + percent.clamp(0.0, 100.0) as u64);
        }
    }
}

/// Configure the Rayon thread pool
fn configure_thread_pool(num_threads: usize) -> Result<()> {
    match rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
    {
        Ok(()) => {
            debug!("Configured thread pool with {} threads", num_threads);
        }
        Err(e) => {
            // If the pool is already initialized (e.g., in tests), that's OK
            if e.to_string().contains("already been initialized") {
                debug!("Thread pool already initialized, using existing pool");
            } else {
                return Err(SplitError::ConfigError(format!(
                    "Failed to configure thread pool: {}",
                    e
                )));
            }
        }
    }
    Ok(())
}
