//! Command-line front end for RGSSAD archive extraction
//!
//! The binary is a thin wrapper around [`run`]: detect the archive version,
//! decode it, then either list or extract its entries and optionally write
//! an editor project stub next to them.

pub mod config;
pub mod error;

pub use config::CliConfig;
pub use error::CliError;

use rgssad_formats::{ArchiveFormat, ArchiveHandle, DirectoryEntry, detect, extract_all, generate_project};
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, warn};

/// What a successful run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Detected archive generation
    pub format: ArchiveFormat,
    /// Number of entries in the archive
    pub entries: usize,
    /// Files written (empty when listing)
    pub extracted: Vec<PathBuf>,
    /// Project stub, when requested
    pub project_file: Option<PathBuf>,
}

/// Execute one extractor invocation, writing listings to `out`.
pub fn run<W: Write>(config: &CliConfig, out: &mut W) -> Result<RunReport, CliError> {
    config.validate()?;

    let format = detect(config.input())?;
    if !format.is_valid() {
        return Err(CliError::InvalidInput);
    }
    info!("Detected {} archive {}", format, config.input().display());

    let mut archive = ArchiveHandle::open(config.input())?;
    let entries = archive.len();

    if config.list {
        for entry in archive.entries() {
            write_listing(out, entry).map_err(|e| CliError::Extraction(e.into()))?;
        }
        archive.close();
        return Ok(RunReport {
            format,
            entries,
            extracted: Vec::new(),
            project_file: None,
        });
    }

    let output_dir = config.output_dir();
    let summary = extract_all(&mut archive, &output_dir, &config.extract_options())?;
    archive.close();

    // The stub does not depend on the entries, so write it even if some failed.
    let project_file = if config.project {
        Some(generate_project(format, &output_dir)?)
    } else {
        None
    };

    for failure in &summary.failures {
        warn!("Failed to extract '{}': {}", failure.name, failure.error);
    }
    if !summary.is_complete() {
        return Err(CliError::Incomplete {
            failed: summary.failures.len(),
            total: entries,
        });
    }

    Ok(RunReport {
        format,
        entries,
        extracted: summary.extracted,
        project_file,
    })
}

fn write_listing<W: Write>(out: &mut W, entry: &DirectoryEntry) -> std::io::Result<()> {
    writeln!(
        out,
        "{:>10}  {:#010x}  {}",
        entry.size, entry.payload_offset, entry.name
    )
}
