//! Error types for the extractor front end.
//!
//! Library errors are folded into the three messages users of the original
//! tool know, keeping the underlying error as the source.

use rgssad_formats::RgssadError;
use thiserror::Error;

/// Front-end failures, each mapped to one user-facing message.
#[derive(Debug, Error)]
pub enum CliError {
    /// Header check failed before opening
    #[error("Invalid input file.")]
    InvalidInput,

    /// Archive is malformed or truncated
    #[error("Archive is invalid or corrupted. Reading failed.")]
    InvalidArchive(#[source] RgssadError),

    /// Version byte not supported
    #[error("Archive is not supported or it is corrupted.")]
    Unsupported(#[source] RgssadError),

    /// Any other failure while reading or writing
    #[error("Something went wrong with reading or extraction. Archive is likely invalid or corrupted.")]
    Extraction(#[source] RgssadError),

    /// Some entries could not be written
    #[error("{failed} of {total} files could not be extracted.")]
    Incomplete {
        /// Entries that failed
        failed: usize,
        /// Entries in the archive
        total: usize,
    },

    /// Invalid command-line configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<RgssadError> for CliError {
    fn from(err: RgssadError) -> Self {
        if err.is_invalid_archive() {
            Self::InvalidArchive(err)
        } else if err.is_unsupported() {
            Self::Unsupported(err)
        } else {
            Self::Extraction(err)
        }
    }
}
