//! Directory table decoders
//!
//! The two archive generations frame their directory tables differently:
//!
//! ```text
//! Evolving key (XP / VX), entries run until end-of-file:
//!   [u32 name_len][name_len bytes name][u32 size][size bytes payload] ...
//!
//! Master key (VX Ace), entries run until a zero offset:
//!   [u32 seed] ([u32 offset][u32 size][u32 key][u32 name_len][name]) ... [sentinel]
//! ```
//!
//! The evolving-key table must be decoded strictly in stream order: every
//! integer and name byte advances the key used for everything after it.
//! Each decoded entry stores the key its payload starts from, so payloads
//! can later be decrypted in any order.

use crate::entry::DirectoryEntry;
use crate::error::{Result, RgssadError};
use crate::header::{ArchiveFormat, HEADER_SIZE};
use crate::reader::ArchiveReader;
use rgssad_crypto::{EvolvingKey, MasterKey, PayloadCipher, RepeatingKey};
use std::io::{Read, Seek};
use tracing::{debug, warn};

/// Directory table layout, selected from the detected format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableDecoder {
    /// XP/VX: one key advanced after every field and byte
    EvolvingKey,
    /// VX Ace: fixed master key for table integers, per-entry name keys
    MasterKey,
}

impl TableDecoder {
    /// Decoder for a detected format, `None` for [`ArchiveFormat::Invalid`].
    pub fn for_format(format: ArchiveFormat) -> Option<Self> {
        match format {
            ArchiveFormat::Xp | ArchiveFormat::Vx => Some(Self::EvolvingKey),
            ArchiveFormat::VxAce => Some(Self::MasterKey),
            ArchiveFormat::Invalid => None,
        }
    }

    /// Decode the whole directory table, starting just past the header.
    pub fn decode<R: Read + Seek>(self, reader: &mut ArchiveReader<R>) -> Result<Vec<DirectoryEntry>> {
        reader.seek_to(HEADER_SIZE)?;
        let entries = match self {
            Self::EvolvingKey => decode_evolving(reader, EvolvingKey::seeded())?,
            Self::MasterKey => decode_master(reader)?,
        };
        debug!("Decoded {} directory entries ({:?})", entries.len(), self);
        Ok(entries)
    }

    /// Keystream that decrypts `entry`'s payload from its first byte.
    pub fn payload_cipher(self, entry: &DirectoryEntry) -> PayloadCipher {
        match self {
            Self::EvolvingKey => PayloadCipher::evolving(entry.content_key),
            Self::MasterKey => PayloadCipher::repeating(entry.content_key),
        }
    }
}

fn decode_name(bytes: Vec<u8>, offset: u64) -> String {
    String::from_utf8(bytes).unwrap_or_else(|err| {
        warn!("Entry name at offset {offset} is not valid UTF-8, replacing invalid bytes");
        String::from_utf8_lossy(err.as_bytes()).into_owned()
    })
}

fn decode_evolving<R: Read + Seek>(
    reader: &mut ArchiveReader<R>,
    seed: EvolvingKey,
) -> Result<Vec<DirectoryEntry>> {
    let mut entries = Vec::new();
    let mut key = seed;
    while !reader.is_at_end() {
        let (entry, next) = read_evolving_entry(reader, key)?;
        entries.push(entry);
        key = next;
    }
    Ok(entries)
}

/// Decode one entry and skip its payload. Returns the key the next entry
/// starts from; payload bytes never advance the table key.
fn read_evolving_entry<R: Read + Seek>(
    reader: &mut ArchiveReader<R>,
    key: EvolvingKey,
) -> Result<(DirectoryEntry, EvolvingKey)> {
    let name_offset = reader.position();

    let (name_len, key) = key.apply_u32(reader.read_u32_le("entry name length")?);
    let mut name = reader.read_bytes(u64::from(name_len), "entry name")?;
    let key = key.apply_keystream(&mut name);
    let (size, key) = key.apply_u32(reader.read_u32_le("entry size")?);

    let payload_offset = reader.position();
    reader.skip(u64::from(size), "entry payload")?;

    let entry = DirectoryEntry {
        name: decode_name(name, name_offset),
        size,
        payload_offset,
        content_key: key.value(),
    };
    Ok((entry, key))
}

fn decode_master<R: Read + Seek>(reader: &mut ArchiveReader<R>) -> Result<Vec<DirectoryEntry>> {
    let master = MasterKey::from_seed(reader.read_u32_le("master key seed")?);
    let mut entries = Vec::new();

    loop {
        let entry_offset = reader.position();
        let payload_offset = master.apply_u32(reader.read_u32_le("entry offset")?);
        let size = master.apply_u32(reader.read_u32_le("entry size")?);
        let content_key = master.apply_u32(reader.read_u32_le("entry key")?);
        let name_len = master.apply_u32(reader.read_u32_le("entry name length")?);

        if payload_offset == 0 {
            break;
        }

        let mut name = reader.read_bytes(u64::from(name_len), "entry name")?;
        RepeatingKey::new(content_key).apply_keystream(&mut name);

        let entry = DirectoryEntry {
            name: decode_name(name, entry_offset),
            size,
            payload_offset: u64::from(payload_offset),
            content_key,
        };
        if entry.end_offset() > reader.len() {
            return Err(RgssadError::invalid(format!(
                "payload of '{}' spans {}..{} past end of stream ({})",
                entry.name,
                entry.payload_offset,
                entry.end_offset(),
                reader.len()
            )));
        }
        entries.push(entry);
    }

    Ok(entries)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rgssad_crypto::advance_key;
    use rgssad_test_utils::{EvolvingArchiveBuilder, MasterArchiveBuilder, header};
    use std::io::Cursor;

    fn reader(data: Vec<u8>) -> ArchiveReader<Cursor<Vec<u8>>> {
        ArchiveReader::new(Cursor::new(data)).unwrap()
    }

    fn decode(decoder: TableDecoder, data: Vec<u8>) -> Result<Vec<DirectoryEntry>> {
        decoder.decode(&mut reader(data))
    }

    #[test]
    fn test_for_format() {
        assert_eq!(TableDecoder::for_format(ArchiveFormat::Xp), Some(TableDecoder::EvolvingKey));
        assert_eq!(TableDecoder::for_format(ArchiveFormat::Vx), Some(TableDecoder::EvolvingKey));
        assert_eq!(TableDecoder::for_format(ArchiveFormat::VxAce), Some(TableDecoder::MasterKey));
        assert_eq!(TableDecoder::for_format(ArchiveFormat::Invalid), None);
    }

    #[test]
    fn test_evolving_single_entry_hand_computed() {
        // One entry "ab" with a 3 byte payload, encoded by hand
        let k0 = 0xDEAD_CAFEu32;
        let k1 = advance_key(k0);
        let k2 = advance_key(k1);
        let k3 = advance_key(k2);
        let k4 = advance_key(k3);

        let mut data = header(1);
        data.extend_from_slice(&(2 ^ k0).to_le_bytes());
        data.push(b'a' ^ (k1 & 0xFF) as u8);
        data.push(b'b' ^ (k2 & 0xFF) as u8);
        data.extend_from_slice(&(3 ^ k3).to_le_bytes());
        data.extend_from_slice(&[0, 0, 0]);

        let entries = decode(TableDecoder::EvolvingKey, data).unwrap();
        assert_eq!(
            entries,
            vec![DirectoryEntry {
                name: "ab".to_string(),
                size: 3,
                payload_offset: 8 + 4 + 2 + 4,
                content_key: k4,
            }]
        );

        // Two integer decodes plus two name bytes
        assert_eq!(
            entries[0].content_key,
            EvolvingKey::seeded().advance_by(2 + 2).value()
        );
    }

    #[test]
    fn test_evolving_key_threads_across_entries() {
        let data = EvolvingArchiveBuilder::new()
            .entry("first.txt", b"12345".to_vec())
            .entry("second.txt", b"67".to_vec())
            .build();
        let entries = decode(TableDecoder::EvolvingKey, data).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "first.txt");
        assert_eq!(entries[1].name, "second.txt");

        // Entry 1: 2 ints + 9 name bytes; entry 2 adds 2 ints + 10 bytes
        let seed = EvolvingKey::seeded();
        assert_eq!(entries[0].content_key, seed.advance_by(11).value());
        assert_eq!(entries[1].content_key, seed.advance_by(11 + 12).value());
    }

    #[test]
    fn test_evolving_empty_name_and_payload() {
        let data = EvolvingArchiveBuilder::new().entry("", Vec::new()).build();
        let entries = decode(TableDecoder::EvolvingKey, data).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "");
        assert_eq!(entries[0].size, 0);
        assert_eq!(entries[0].payload_offset, 16);
    }

    #[test]
    fn test_evolving_header_only_archive_is_empty() {
        let entries = decode(TableDecoder::EvolvingKey, header(1)).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_evolving_oversized_payload_is_invalid() {
        let mut data = EvolvingArchiveBuilder::new()
            .entry("a.txt", b"hello".to_vec())
            .build();
        data.truncate(data.len() - 1);

        let err = decode(TableDecoder::EvolvingKey, data).unwrap_err();
        assert!(err.is_invalid_archive());
    }

    #[test]
    fn test_evolving_truncated_length_field_is_invalid() {
        let mut data = EvolvingArchiveBuilder::new()
            .entry("a.txt", b"hi".to_vec())
            .build();
        data.extend_from_slice(&[0x01, 0x02]);

        let err = decode(TableDecoder::EvolvingKey, data).unwrap_err();
        assert!(err.is_invalid_archive());
    }

    #[test]
    fn test_evolving_wrong_seed_garbles_instead_of_failing() {
        // A single entry decoded from the wrong starting key produces a
        // nonsense length that runs off the stream.
        let data = EvolvingArchiveBuilder::new()
            .entry("a.txt", b"hi".to_vec())
            .build();
        let mut reader = reader(data);
        reader.seek_to(HEADER_SIZE).unwrap();
        let result = decode_evolving(&mut reader, EvolvingKey::new(0));
        assert!(result.unwrap_err().is_invalid_archive());
    }

    #[test]
    fn test_master_sentinel_only() {
        let data = MasterArchiveBuilder::new(0x0000_0042).build();
        let mut reader = reader(data);
        let entries = TableDecoder::MasterKey.decode(&mut reader).unwrap();

        assert!(entries.is_empty());
        // Header, seed, then exactly four sentinel integers
        assert_eq!(reader.position(), 8 + 4 + 16);
    }

    #[test]
    fn test_master_fields_use_plain_xor() {
        let seed = 7u32;
        let master = seed.wrapping_mul(9).wrapping_add(3);

        let mut data = header(3);
        data.extend_from_slice(&seed.to_le_bytes());
        for field in [60u32, 2, 0, 5] {
            data.extend_from_slice(&(field ^ master).to_le_bytes());
        }
        data.extend_from_slice(b"b.txt");
        for _ in 0..4 {
            data.extend_from_slice(&master.to_le_bytes());
        }
        data.resize(62, 0);

        let entries = decode(TableDecoder::MasterKey, data).unwrap();
        assert_eq!(
            entries,
            vec![DirectoryEntry {
                name: "b.txt".to_string(),
                size: 2,
                payload_offset: 60,
                content_key: 0,
            }]
        );
    }

    #[test]
    fn test_master_name_uses_content_key() {
        let data = MasterArchiveBuilder::new(0xFFFF_FFFF)
            .entry("Graphics\\a.png", 0xA1B2_C3D4, vec![9; 10])
            .entry("Data\\b.rvdata2", 0x0102_0304, vec![8; 3])
            .build();
        let entries = decode(TableDecoder::MasterKey, data).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "Graphics\\a.png");
        assert_eq!(entries[0].content_key, 0xA1B2_C3D4);
        assert_eq!(entries[1].name, "Data\\b.rvdata2");
        assert_eq!(entries[1].size, 3);
    }

    #[test]
    fn test_master_missing_sentinel_is_invalid() {
        let mut data = MasterArchiveBuilder::new(1)
            .entry("a", 0, b"x".to_vec())
            .build();
        // Header + seed + first entry (16 + 1), sentinel and payload dropped
        data.truncate(8 + 4 + 17);

        let err = decode(TableDecoder::MasterKey, data).unwrap_err();
        assert!(err.is_invalid_archive());
    }

    #[test]
    fn test_master_payload_past_end_is_invalid() {
        let mut data = MasterArchiveBuilder::new(1)
            .entry("a", 0, b"xyz".to_vec())
            .build();
        data.pop();

        let err = decode(TableDecoder::MasterKey, data).unwrap_err();
        assert!(err.is_invalid_archive());
    }

    #[test]
    fn test_invalid_utf8_name_is_replaced() {
        let data = EvolvingArchiveBuilder::new()
            .entry([b'a', 0xFF, b'b'], Vec::new())
            .build();
        let entries = decode(TableDecoder::EvolvingKey, data).unwrap();
        assert_eq!(entries[0].name, "a\u{FFFD}b");
    }

    #[test]
    fn test_payload_cipher_selection() {
        let entry = DirectoryEntry {
            name: String::new(),
            size: 0,
            payload_offset: 0,
            content_key: 42,
        };
        assert_eq!(
            TableDecoder::EvolvingKey.payload_cipher(&entry),
            PayloadCipher::evolving(42)
        );
        assert_eq!(
            TableDecoder::MasterKey.payload_cipher(&entry),
            PayloadCipher::repeating(42)
        );
    }
}
