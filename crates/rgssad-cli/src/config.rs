//! Command-line configuration.
//!
//! Options come from CLI arguments with environment variable fallbacks
//! (`RGSSAD_OUTPUT`, `RGSSAD_PROJECT`, `RGSSAD_OVERWRITE`).
//!
//! # Example
//!
//! ```no_run
//! use rgssad_cli::CliConfig;
//!
//! let config = CliConfig::from_args();
//! config.validate().expect("Invalid configuration");
//!
//! println!("Extracting to: {}", config.output_dir().display());
//! ```

use crate::error::CliError;
use clap::Parser;
use rgssad_formats::ExtractOptions;
use std::path::{Path, PathBuf};

/// Extractor configuration loaded from CLI args and environment variables.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "rgssad-extract",
    about = "Extract RPG Maker XP, VX and VX Ace encrypted archives",
    version
)]
pub struct CliConfig {
    /// Archive to read (.rgssad, .rgss2a or .rgss3a)
    pub input: PathBuf,

    /// Output directory (defaults to the archive's directory)
    #[arg(short, long, env = "RGSSAD_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Also write an editor project file for the detected engine version
    #[arg(short, long, env = "RGSSAD_PROJECT")]
    pub project: bool,

    /// Replace files that already exist in the output directory
    #[arg(long, env = "RGSSAD_OVERWRITE")]
    pub overwrite: bool,

    /// List archive entries instead of extracting them
    #[arg(short, long)]
    pub list: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl CliConfig {
    /// Parse configuration from command-line arguments.
    #[must_use]
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Directory extracted files are written to.
    pub fn output_dir(&self) -> PathBuf {
        if let Some(output) = &self.output {
            return output.clone();
        }
        match self.input.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Library extraction settings.
    pub const fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            overwrite: self.overwrite,
        }
    }

    /// Default log filter when `RUST_LOG` is not set.
    pub const fn log_filter(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Validate configuration.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Config` if:
    /// - The input archive does not exist or is not a file
    /// - The output path exists but is not a directory
    pub fn validate(&self) -> Result<(), CliError> {
        if !self.input.is_file() {
            return Err(CliError::Config(format!(
                "input archive not found: {}",
                self.input.display()
            )));
        }

        let output = self.output_dir();
        if output.exists() && !output.is_dir() {
            return Err(CliError::Config(format!(
                "output path is not a directory: {}",
                output.display()
            )));
        }

        Ok(())
    }

    /// Input file extension, if any.
    pub fn input_extension(&self) -> Option<&str> {
        self.input.extension().and_then(|ext| ext.to_str())
    }

    /// Input path.
    pub fn input(&self) -> &Path {
        &self.input
    }
}
