//! rgssad-extract binary entry point.
//!
//! This is a thin wrapper around the rgssad-cli library that:
//! 1. Parses command-line arguments
//! 2. Initializes logging
//! 3. Runs the extraction
//!
//! Any failure prints the user-facing message alone and exits with status 1.
//! The underlying cause is logged at debug level.

use anyhow::{Result, anyhow};
use rgssad_cli::{CliConfig, run};
use std::process::ExitCode;

fn main() -> ExitCode {
    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!("{err:?}");
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn try_main() -> Result<()> {
    let config = CliConfig::from_args();

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.log_filter())),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {e}"))?;

    let report = run(&config, &mut std::io::stdout().lock())?;

    if !config.list {
        tracing::info!(
            "Extracted {} of {} files from {} archive",
            report.extracted.len(),
            report.entries,
            report.format
        );
    }
    if let Some(project) = report.project_file {
        tracing::info!("Project file written to {}", project.display());
    }

    Ok(())
}
