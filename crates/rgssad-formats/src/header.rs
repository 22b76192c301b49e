//! RGSSAD header parsing and format detection
//!
//! Every archive starts with 8 bytes:
//! - Magic signature `"RGSSAD\0"` (7 bytes)
//! - Version byte (1 = XP/VX evolving key, 3 = VX Ace master key)
//!
//! XP and VX archives are byte-for-byte the same format; only the file
//! extension (`.rgssad` vs `.rgss2a`) tells them apart.

use crate::error::{Result, RgssadError};
use binrw::BinRead;
use std::fmt;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use tracing::debug;

/// Magic signature at the start of every archive
pub const RGSSAD_MAGIC: [u8; 7] = *b"RGSSAD\0";

/// Header length in bytes
pub const HEADER_SIZE: u64 = 8;

/// Version byte of XP and VX archives
pub const VERSION_EVOLVING_KEY: u8 = 1;

/// Version byte of VX Ace archives
pub const VERSION_MASTER_KEY: u8 = 3;

/// Fixed 8-byte archive header
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct RgssadHeader {
    /// Magic signature, always `"RGSSAD\0"`
    #[br(assert(magic == RGSSAD_MAGIC, "Invalid RGSSAD magic: {:?}", magic))]
    pub magic: [u8; 7],

    /// Format version byte
    pub version: u8,
}

impl RgssadHeader {
    /// Parse the header from the start of `reader`.
    pub fn parse<R: Read + Seek>(reader: &mut R) -> Result<Self> {
        reader.seek(SeekFrom::Start(0))?;
        Ok(Self::read(reader)?)
    }
}

/// Archive generation as recognised from the header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveFormat {
    /// RPG Maker XP (`.rgssad`, version 1)
    Xp,
    /// RPG Maker VX (`.rgss2a`, version 1)
    Vx,
    /// RPG Maker VX Ace (`.rgss3a`, version 3)
    VxAce,
    /// Not an RGSSAD archive, or a version this crate does not decode
    Invalid,
}

impl ArchiveFormat {
    /// Classify a version byte. Version 1 is reported as VX only when the
    /// archive's extension is `rgss2a`.
    pub fn from_version(version: u8, extension: Option<&str>) -> Self {
        match version {
            VERSION_EVOLVING_KEY => {
                if extension.is_some_and(|ext| ext.eq_ignore_ascii_case("rgss2a")) {
                    Self::Vx
                } else {
                    Self::Xp
                }
            }
            VERSION_MASTER_KEY => Self::VxAce,
            _ => Self::Invalid,
        }
    }

    /// Conventional archive file extension
    pub fn extension(self) -> Option<&'static str> {
        match self {
            Self::Xp => Some("rgssad"),
            Self::Vx => Some("rgss2a"),
            Self::VxAce => Some("rgss3a"),
            Self::Invalid => None,
        }
    }

    /// Whether the format can be decoded
    pub fn is_valid(self) -> bool {
        !matches!(self, Self::Invalid)
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Xp => "RPG Maker XP",
            Self::Vx => "RPG Maker VX",
            Self::VxAce => "RPG Maker VX Ace",
            Self::Invalid => "invalid",
        };
        f.write_str(name)
    }
}

pub(crate) fn extension_of(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

/// Detect the archive format of the file at `path`.
///
/// Only failing to open or read the file is an error; short files, wrong
/// magic and unknown versions all yield [`ArchiveFormat::Invalid`].
pub fn detect<P: AsRef<Path>>(path: P) -> Result<ArchiveFormat> {
    let path = path.as_ref();
    let mut file = File::open(path)?;
    let format = detect_reader(&mut file, extension_of(path))?;
    debug!("Detected {} for {}", format, path.display());
    Ok(format)
}

/// Detect the archive format of an already open stream.
///
/// Reads at most the 8 header bytes and restores the stream position.
pub fn detect_reader<R: Read + Seek>(reader: &mut R, extension: Option<&str>) -> Result<ArchiveFormat> {
    let start = reader.stream_position()?;
    let header = RgssadHeader::parse(reader);
    reader.seek(SeekFrom::Start(start))?;

    match header {
        Ok(header) => Ok(ArchiveFormat::from_version(header.version, extension)),
        Err(RgssadError::Io(err)) => Err(RgssadError::Io(err)),
        Err(_) => Ok(ArchiveFormat::Invalid),
    }
}
