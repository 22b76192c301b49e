//! Extraction of decoded entries to the filesystem
//!
//! Entry names are converted from backslash-separated archive paths to host
//! paths below the destination directory; intermediate directories are
//! created as needed. Failures that only concern one entry (I/O, existing
//! destination, unsafe name) are collected and extraction moves on; archive
//! corruption aborts the whole run.

use crate::archive::ArchiveHandle;
use crate::entry::DirectoryEntry;
use crate::error::{Result, RgssadError};
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, ErrorKind, Read, Seek, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Extraction settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Replace files that already exist at the destination
    pub overwrite: bool,
}

/// Entry that could not be written
#[derive(Debug)]
pub struct EntryFailure {
    /// Archive name of the entry
    pub name: String,
    /// Why it failed
    pub error: RgssadError,
}

/// Outcome of [`extract_all`]
#[derive(Debug, Default)]
pub struct ExtractSummary {
    /// Files written, in table order
    pub extracted: Vec<PathBuf>,
    /// Total payload bytes written
    pub bytes_written: u64,
    /// Entries skipped because of entry-local errors
    pub failures: Vec<EntryFailure>,
}

impl ExtractSummary {
    /// Whether every entry was written
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Extract every entry in table order below `dest_dir`.
///
/// # Errors
///
/// Archive-level errors ([`RgssadError::InvalidFormat`],
/// [`RgssadError::UnsupportedFormat`]) and failing to create `dest_dir`
/// abort extraction. Entry-local errors are recorded in the summary.
pub fn extract_all<R: Read + Seek>(
    archive: &mut ArchiveHandle<R>,
    dest_dir: &Path,
    options: &ExtractOptions,
) -> Result<ExtractSummary> {
    fs::create_dir_all(dest_dir)?;
    info!(
        "Extracting {} entries to {}",
        archive.len(),
        dest_dir.display()
    );

    let entries = archive.entries().to_vec();
    let mut summary = ExtractSummary::default();

    for entry in &entries {
        match write_entry(archive, entry, dest_dir, options.overwrite) {
            Ok((path, written)) => {
                summary.extracted.push(path);
                summary.bytes_written += written;
            }
            Err(error) if error.is_entry_local() => {
                warn!("Skipping '{}': {}", entry.name, error);
                summary.failures.push(EntryFailure {
                    name: entry.name.clone(),
                    error,
                });
            }
            Err(error) => return Err(error),
        }
    }

    info!(
        "Extracted {} files ({} bytes), {} failed",
        summary.extracted.len(),
        summary.bytes_written,
        summary.failures.len()
    );
    Ok(summary)
}

/// Extract a single entry below `dest_dir` and return the written path.
///
/// With `overwrite == false` an existing destination file is left untouched
/// and [`RgssadError::AlreadyExists`] is returned.
pub fn extract_one<R: Read + Seek>(
    archive: &mut ArchiveHandle<R>,
    entry: &DirectoryEntry,
    dest_dir: &Path,
    overwrite: bool,
) -> Result<PathBuf> {
    write_entry(archive, entry, dest_dir, overwrite).map(|(path, _)| path)
}

fn write_entry<R: Read + Seek>(
    archive: &mut ArchiveHandle<R>,
    entry: &DirectoryEntry,
    dest_dir: &Path,
    overwrite: bool,
) -> Result<(PathBuf, u64)> {
    let target = dest_dir.join(entry.relative_path()?);
    // Corrupt tables must not leave empty files behind.
    archive.check_payload_bounds(entry)?;
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut options = OpenOptions::new();
    options.write(true);
    if overwrite {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }
    let file = options.open(&target).map_err(|err| {
        if err.kind() == ErrorKind::AlreadyExists {
            RgssadError::AlreadyExists(target.clone())
        } else {
            RgssadError::Io(err)
        }
    })?;

    let mut writer = BufWriter::new(file);
    let copied = archive
        .copy_entry(entry, &mut writer)
        .and_then(|written| writer.flush().map(|()| written).map_err(RgssadError::from));
    let written = match copied {
        Ok(written) => written,
        Err(error) => {
            drop(writer);
            if let Err(err) = fs::remove_file(&target) {
                warn!("Could not remove partial file {}: {}", target.display(), err);
            }
            return Err(error);
        }
    };

    debug!("Wrote {} ({} bytes)", target.display(), written);
    Ok((target, written))
}
