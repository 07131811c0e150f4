//! stemsplit CLI entry point

use clap::Parser;
use std::process::ExitCode;
use stemsplit::config::{Cli, Settings};
use stemsplit::pipeline;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(&cli);

    let settings = Settings::from_cli(&cli);

    if let Err(e) = validate_inputs(&cli) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    match pipeline::run(&settings) {
        Ok(result) => {
            println!();
            println!(
                "Summary: {} successful, {} partial, {} failed, {} skipped (of {} total)",
                result.successful,
                result.partial.len(),
                result.failed,
                result.skipped,
                result.total_files
            );
            for report in &result.partial {
                let written: Vec<&str> = report.written.iter().map(|s| s.label()).collect();
                let failed: Vec<&str> = report.failed.iter().map(|s| s.label()).collect();
                println!(
                    "  {}: wrote {}; failed {}",
                    report.source.display(),
                    written.join(", "),
                    failed.join(", ")
                );
            }

            if result.failed > 0 || !result.partial.is_empty() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("Fatal error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cli: &Cli) {
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = if cli.quiet { "error" } else { filter };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

fn validate_inputs(cli: &Cli) -> Result<(), String> {
    if !cli.input.exists() {
        return Err(format!(
            "Input path does not exist: {}\n\n  Tip: Check the path is correct and accessible.\n  Examples:\n    stemsplit -i ~/Music -o ./stems\n    stemsplit -i ./track.wav -o ./output",
            cli.input.display()
        ));
    }

    // The output directory itself is created by the pipeline
    if let Some(parent) = cli.output.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            return Err(format!(
                "Output parent directory does not exist: {}\n\n  Tip: The output directory will be created automatically,\n  but its parent directory must exist.\n  Example: mkdir -p {}",
                parent.display(),
                parent.display()
            ));
        }
    }

    if cli.frame_size < 2 {
        return Err(format!(
            "Frame size must be at least 2, got {}",
            cli.frame_size
        ));
    }
    if cli.hop_size == 0 || cli.hop_size > cli.frame_size {
        return Err(format!(
            "Hop size must be between 1 and the frame size ({}), got {}",
            cli.frame_size, cli.hop_size
        ));
    }

    Ok(())
}
