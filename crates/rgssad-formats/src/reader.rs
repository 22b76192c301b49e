//! Bounds-checked byte cursor over an archive stream
//!
//! Every read and skip is checked against the stream length captured at
//! construction, so a corrupted length field surfaces as
//! [`RgssadError::InvalidFormat`] instead of a huge allocation or a silent
//! truncation.

use crate::error::{Result, RgssadError};
use binrw::BinReaderExt;
use std::io::{Read, Seek, SeekFrom};

/// Seekable little-endian reader that owns the archive stream
#[derive(Debug)]
pub struct ArchiveReader<R: Read + Seek> {
    reader: R,
    position: u64,
    len: u64,
}

impl<R: Read + Seek> ArchiveReader<R> {
    /// Wrap a stream, measuring its total length and rewinding to offset 0.
    pub fn new(mut reader: R) -> Result<Self> {
        let len = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(0))?;
        Ok(Self {
            reader,
            position: 0,
            len,
        })
    }

    /// Total stream length in bytes
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Whether the stream holds no bytes at all
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current cursor position
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Bytes left between the cursor and end-of-stream
    pub fn remaining(&self) -> u64 {
        self.len.saturating_sub(self.position)
    }

    /// Whether the cursor sits exactly on end-of-stream
    pub fn is_at_end(&self) -> bool {
        self.position == self.len
    }

    fn ensure_available(&self, count: u64, field: &str) -> Result<()> {
        if count > self.remaining() {
            return Err(RgssadError::invalid(format!(
                "{field} at offset {} needs {count} bytes but only {} remain",
                self.position,
                self.remaining()
            )));
        }
        Ok(())
    }

    /// Move the cursor to an absolute offset inside the stream.
    pub fn seek_to(&mut self, offset: u64) -> Result<()> {
        if offset > self.len {
            return Err(RgssadError::invalid(format!(
                "offset {offset} is past end of stream ({})",
                self.len
            )));
        }
        self.reader.seek(SeekFrom::Start(offset))?;
        self.position = offset;
        Ok(())
    }

    /// Read one little-endian `u32`.
    pub fn read_u32_le(&mut self, field: &str) -> Result<u32> {
        self.ensure_available(4, field)?;
        let value: u32 = self.reader.read_le()?;
        self.position += 4;
        Ok(value)
    }

    /// Read `count` raw bytes.
    pub fn read_bytes(&mut self, count: u64, field: &str) -> Result<Vec<u8>> {
        self.ensure_available(count, field)?;
        let size = usize::try_from(count)
            .map_err(|_| RgssadError::invalid(format!("{field} is too large for this platform")))?;
        let mut data = vec![0u8; size];
        self.read_exact_into(&mut data)?;
        Ok(data)
    }

    /// Fill `buf` completely from the current position.
    pub fn read_exact_into(&mut self, buf: &mut [u8]) -> Result<()> {
        self.ensure_available(buf.len() as u64, "read")?;
        self.reader.read_exact(buf)?;
        self.position += buf.len() as u64;
        Ok(())
    }

    /// Skip `count` bytes without reading them.
    pub fn skip(&mut self, count: u64, field: &str) -> Result<()> {
        self.ensure_available(count, field)?;
        self.seek_to(self.position + count)
    }

    /// Release the underlying stream.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_reads_little_endian() {
        let mut reader = ArchiveReader::new(Cursor::new(vec![1, 0, 0, 0, 0xAA, 0xBB])).unwrap();
        assert_eq!(reader.len(), 6);
        assert_eq!(reader.read_u32_le("value").unwrap(), 1);
        assert_eq!(reader.position(), 4);
        assert_eq!(reader.read_bytes(2, "tail").unwrap(), vec![0xAA, 0xBB]);
        assert!(reader.is_at_end());
    }

    #[test]
    fn test_short_read_is_invalid_format() {
        let mut reader = ArchiveReader::new(Cursor::new(vec![1, 2, 3])).unwrap();
        let err = reader.read_u32_le("entry length").unwrap_err();
        assert!(err.is_invalid_archive());
        assert!(err.to_string().contains("entry length"));
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn test_oversized_read_does_not_allocate() {
        let mut reader = ArchiveReader::new(Cursor::new(vec![0u8; 8])).unwrap();
        let err = reader.read_bytes(u64::from(u32::MAX), "name").unwrap_err();
        assert!(err.is_invalid_archive());
    }

    #[test]
    fn test_skip_bounds() {
        let mut reader = ArchiveReader::new(Cursor::new(vec![0u8; 10])).unwrap();
        reader.skip(10, "payload").unwrap();
        assert!(reader.is_at_end());
        assert!(reader.skip(1, "payload").unwrap_err().is_invalid_archive());
    }

    #[test]
    fn test_seek_to() {
        let mut reader = ArchiveReader::new(Cursor::new(vec![0u8, 1, 2, 3])).unwrap();
        reader.seek_to(3).unwrap();
        assert_eq!(reader.read_bytes(1, "byte").unwrap(), vec![3]);
        assert!(reader.seek_to(5).is_err());
    }

    #[test]
    fn test_new_rewinds_stream() {
        let mut cursor = Cursor::new(vec![7u8, 0, 0, 0]);
        cursor.set_position(2);
        let mut reader = ArchiveReader::new(cursor).unwrap();
        assert_eq!(reader.read_u32_le("value").unwrap(), 7);
    }
}
