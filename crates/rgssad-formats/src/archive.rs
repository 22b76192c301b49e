//! Open archive handle and payload decryption

use crate::entry::DirectoryEntry;
use crate::error::{Result, RgssadError};
use crate::header::{ArchiveFormat, RgssadHeader, extension_of};
use crate::reader::ArchiveReader;
use crate::table::TableDecoder;
use std::fs::File;
use std::io::{Read, Seek, Write};
use std::path::Path;
use tracing::{debug, info};

/// Payload bytes decrypted per read when streaming an entry
const COPY_CHUNK_SIZE: usize = 64 * 1024;

/// An opened archive: the stream, its format and the decoded directory table
///
/// The table is decoded once in [`ArchiveHandle::open`] and never changes.
/// Payloads are decrypted lazily from the stream, so the handle must stay
/// alive while entries are read; [`ArchiveHandle::close`] consumes it.
#[derive(Debug)]
pub struct ArchiveHandle<R: Read + Seek = File> {
    reader: ArchiveReader<R>,
    format: ArchiveFormat,
    decoder: TableDecoder,
    entries: Vec<DirectoryEntry>,
}

impl ArchiveHandle<File> {
    /// Open an archive file and decode its directory table.
    ///
    /// The file extension distinguishes XP (`.rgssad`) from VX (`.rgss2a`).
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening archive {}", path.display());
        let file = File::open(path)?;
        Self::from_reader(file, extension_of(path))
    }
}

impl<R: Read + Seek> ArchiveHandle<R> {
    /// Decode an archive from any seekable stream.
    ///
    /// # Errors
    ///
    /// - [`RgssadError::InvalidFormat`] for a bad header or corrupted table
    /// - [`RgssadError::UnsupportedFormat`] for an unknown version byte
    pub fn from_reader(mut stream: R, extension: Option<&str>) -> Result<Self> {
        let header = RgssadHeader::parse(&mut stream)?;
        let format = ArchiveFormat::from_version(header.version, extension);
        let decoder = TableDecoder::for_format(format)
            .ok_or(RgssadError::UnsupportedFormat(header.version))?;

        let mut reader = ArchiveReader::new(stream)?;
        let entries = decoder.decode(&mut reader)?;
        info!(
            "Read {} archive: {} entries, {} bytes",
            format,
            entries.len(),
            reader.len()
        );

        Ok(Self {
            reader,
            format,
            decoder,
            entries,
        })
    }

    /// Detected archive generation
    pub fn format(&self) -> ArchiveFormat {
        self.format
    }

    /// Directory entries in table order
    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the archive holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total archive stream length in bytes
    pub fn stream_len(&self) -> u64 {
        self.reader.len()
    }

    /// Look up an entry by name. `/` and `\` are treated alike.
    pub fn find(&self, name: &str) -> Option<&DirectoryEntry> {
        let wanted = name.replace('/', "\\");
        self.entries
            .iter()
            .find(|entry| entry.name.replace('/', "\\") == wanted)
    }

    /// Check that an entry's payload lies inside the stream.
    pub(crate) fn check_payload_bounds(&self, entry: &DirectoryEntry) -> Result<()> {
        if entry.end_offset() > self.reader.len() {
            return Err(RgssadError::invalid(format!(
                "payload of '{}' spans {}..{} past end of stream ({})",
                entry.name,
                entry.payload_offset,
                entry.end_offset(),
                self.reader.len()
            )));
        }
        Ok(())
    }

    fn seek_to_payload(&mut self, entry: &DirectoryEntry) -> Result<()> {
        self.check_payload_bounds(entry)?;
        self.reader.seek_to(entry.payload_offset)
    }

    /// Decrypt an entry's payload into memory.
    ///
    /// Only depends on the stream bytes and the entry's key, so repeated
    /// calls return identical data.
    pub fn read_entry(&mut self, entry: &DirectoryEntry) -> Result<Vec<u8>> {
        self.seek_to_payload(entry)?;
        let mut data = self
            .reader
            .read_bytes(u64::from(entry.size), "entry payload")?;
        self.decoder.payload_cipher(entry).apply_keystream(&mut data);
        Ok(data)
    }

    /// Stream an entry's decrypted payload into `writer` in fixed-size chunks.
    ///
    /// Returns the number of bytes written.
    pub fn copy_entry<W: Write>(&mut self, entry: &DirectoryEntry, writer: &mut W) -> Result<u64> {
        self.seek_to_payload(entry)?;
        let mut cipher = self.decoder.payload_cipher(entry);
        let mut remaining = u64::from(entry.size);
        let mut buf = vec![0u8; COPY_CHUNK_SIZE];

        while remaining > 0 {
            let chunk_len = usize::try_from(remaining).map_or(COPY_CHUNK_SIZE, |r| r.min(COPY_CHUNK_SIZE));
            let chunk = &mut buf[..chunk_len];
            self.reader.read_exact_into(chunk)?;
            cipher.apply_keystream(chunk);
            writer.write_all(chunk)?;
            remaining -= chunk_len as u64;
        }

        debug!("Copied {} bytes of '{}'", entry.size, entry.name);
        Ok(u64::from(entry.size))
    }

    /// Release the archive stream.
    pub fn close(self) {
        debug!("Closing {} archive", self.format);
    }

    /// Release the archive and hand back the underlying stream.
    pub fn into_inner(self) -> R {
        self.reader.into_inner()
    }
}
