//! Decoder and extractor for RPG Maker RGSSAD archives
//!
#![allow(clippy::cast_possible_truncation)] // Intentional for binary format parsing
#![allow(clippy::doc_markdown)] // Format names don't need backticks
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
#![allow(clippy::needless_pass_by_value)] // Handle consumption in close()
//! RPG Maker XP, VX and VX Ace pack game assets into a single obfuscated
//! container (`.rgssad`, `.rgss2a`, `.rgss3a`). This crate recovers the
//! original file tree.
//!
//! # Supported Formats
//!
//! - **Version 1** (XP, VX): entries framed back-to-back until end-of-file,
//!   every field obfuscated with a key that evolves after each integer and
//!   each byte
//! - **Version 3** (VX Ace): a directory table obfuscated with a fixed master
//!   key, terminated by a zero-offset sentinel; names and payloads use a
//!   per-entry repeating 4-byte key
//!
//! # Usage
//!
//! ```rust,no_run
//! use rgssad_formats::{ArchiveHandle, ExtractOptions, detect, extract_all};
//! use std::path::Path;
//!
//! # fn example() -> rgssad_formats::Result<()> {
//! let format = detect("Game.rgss3a")?;
//! println!("{format}");
//!
//! let mut archive = ArchiveHandle::open("Game.rgss3a")?;
//! for entry in archive.entries() {
//!     println!("{} ({} bytes)", entry.name, entry.size);
//! }
//!
//! let summary = extract_all(&mut archive, Path::new("out"), &ExtractOptions::default())?;
//! println!("{} files extracted", summary.extracted.len());
//! archive.close();
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod archive;
pub mod entry;
pub mod error;
pub mod extract;
pub mod header;
pub mod project;
pub mod reader;
pub mod table;

pub use archive::ArchiveHandle;
pub use entry::DirectoryEntry;
pub use error::{Result, RgssadError};
pub use extract::{EntryFailure, ExtractOptions, ExtractSummary, extract_all, extract_one};
pub use header::{ArchiveFormat, RgssadHeader, detect, detect_reader};
pub use project::generate_project;
pub use reader::ArchiveReader;
pub use table::TableDecoder;
