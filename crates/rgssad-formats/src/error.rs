//! Error types for archive decoding and extraction

use std::path::PathBuf;
use thiserror::Error;

/// Archive operation result type
pub type Result<T> = std::result::Result<T, RgssadError>;

/// Errors raised while reading or extracting an RGSSAD archive
#[derive(Debug, Error)]
pub enum RgssadError {
    /// Header magic mismatch, or the directory table is inconsistent with the
    /// stream (runs past end-of-stream, points outside the file)
    #[error("Invalid archive: {reason}")]
    InvalidFormat {
        /// Detailed description of the inconsistency
        reason: String,
    },

    /// Header magic matches but the version byte is not implemented
    #[error("Unsupported archive version: {0}")]
    UnsupportedFormat(u8),

    /// Destination file already exists and overwriting is disabled
    #[error("Destination already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    /// Entry name would escape the output directory
    #[error("Unsafe entry path: {0}")]
    UnsafePath(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RgssadError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            reason: reason.into(),
        }
    }

    /// Archive is malformed or truncated
    pub fn is_invalid_archive(&self) -> bool {
        matches!(self, Self::InvalidFormat { .. })
    }

    /// Archive uses a version byte this crate does not decode
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::UnsupportedFormat(_))
    }

    /// Failure scoped to a single entry; extraction of other entries can go on
    pub fn is_entry_local(&self) -> bool {
        matches!(
            self,
            Self::Io(_) | Self::AlreadyExists(_) | Self::UnsafePath(_)
        )
    }
}

impl From<binrw::Error> for RgssadError {
    fn from(err: binrw::Error) -> Self {
        if err.is_eof() {
            return Self::invalid("unexpected end of stream");
        }
        match err {
            binrw::Error::Io(io) => Self::Io(io),
            other => Self::invalid(other.to_string()),
        }
    }
}
