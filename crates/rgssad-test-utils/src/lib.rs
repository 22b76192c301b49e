//! Test utilities for rgssad-rs
//!
//! Builders that produce encrypted archives byte-for-byte the way the RPG
//! Maker packager lays them out, so decoder tests do not need real game
//! data checked into the repository.

#![allow(clippy::cast_possible_truncation)]

use rgssad_crypto::{EvolvingKey, MasterKey, RepeatingKey};
use std::path::{Path, PathBuf};

/// Magic signature shared by every archive generation
pub const MAGIC: &[u8; 7] = b"RGSSAD\0";

/// Header bytes for the given version
pub fn header(version: u8) -> Vec<u8> {
    let mut data = MAGIC.to_vec();
    data.push(version);
    data
}

/// Builds XP/VX archives (version 1, evolving key)
#[derive(Debug, Default, Clone)]
pub struct EvolvingArchiveBuilder {
    entries: Vec<(Vec<u8>, Vec<u8>)>,
}

impl EvolvingArchiveBuilder {
    /// Empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry; `name` uses backslash separators like the packager.
    #[must_use]
    pub fn entry(mut self, name: impl AsRef<[u8]>, data: impl Into<Vec<u8>>) -> Self {
        self.entries.push((name.as_ref().to_vec(), data.into()));
        self
    }

    /// Serialize and encrypt the archive.
    pub fn build(&self) -> Vec<u8> {
        let mut out = header(1);
        let mut key = EvolvingKey::seeded();

        for (name, data) in &self.entries {
            let (len, next) = key.apply_u32(name.len() as u32);
            out.extend_from_slice(&len.to_le_bytes());

            let mut name = name.clone();
            let next = next.apply_keystream(&mut name);
            out.extend_from_slice(&name);

            let (size, next) = next.apply_u32(data.len() as u32);
            out.extend_from_slice(&size.to_le_bytes());

            let mut payload = data.clone();
            let _ = next.apply_keystream(&mut payload);
            out.extend_from_slice(&payload);

            key = next;
        }
        out
    }
}

/// Builds VX Ace archives (version 3, master key)
#[derive(Debug, Clone)]
pub struct MasterArchiveBuilder {
    seed: u32,
    entries: Vec<(Vec<u8>, u32, Vec<u8>)>,
}

impl MasterArchiveBuilder {
    /// Empty builder whose header seed is `seed`
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            entries: Vec::new(),
        }
    }

    /// Append an entry encrypted with the per-entry `content_key`.
    #[must_use]
    pub fn entry(mut self, name: impl AsRef<[u8]>, content_key: u32, data: impl Into<Vec<u8>>) -> Self {
        self.entries
            .push((name.as_ref().to_vec(), content_key, data.into()));
        self
    }

    /// Serialize and encrypt the archive. Payloads follow the sentinel in
    /// table order.
    pub fn build(&self) -> Vec<u8> {
        let master = MasterKey::from_seed(self.seed);
        let table_len: usize = self
            .entries
            .iter()
            .map(|(name, _, _)| 16 + name.len())
            .sum::<usize>()
            + 16;
        let mut payload_offset = 8 + 4 + table_len;

        let mut out = header(3);
        out.extend_from_slice(&self.seed.to_le_bytes());

        let mut payloads = Vec::new();
        for (name, content_key, data) in &self.entries {
            for field in [
                payload_offset as u32,
                data.len() as u32,
                *content_key,
                name.len() as u32,
            ] {
                out.extend_from_slice(&master.apply_u32(field).to_le_bytes());
            }

            let mut name = name.clone();
            RepeatingKey::new(*content_key).apply_keystream(&mut name);
            out.extend_from_slice(&name);

            let mut payload = data.clone();
            RepeatingKey::new(*content_key).apply_keystream(&mut payload);
            payloads.extend_from_slice(&payload);
            payload_offset += data.len();
        }

        for _ in 0..4 {
            out.extend_from_slice(&master.apply_u32(0).to_le_bytes());
        }
        out.extend_from_slice(&payloads);
        out
    }
}

/// Write `bytes` to `dir/file_name` and return the full path.
pub fn write_archive(dir: &Path, file_name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(file_name);
    if let Err(err) = std::fs::write(&path, bytes) {
        panic!("failed to write {}: {err}", path.display());
    }
    path
}

/// Fresh temporary directory for a test
pub fn temp_dir() -> tempfile::TempDir {
    match tempfile::tempdir() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

/// A small XP archive with nested directories
pub fn sample_xp_archive() -> Vec<u8> {
    EvolvingArchiveBuilder::new()
        .entry("Data\\Scripts.rxdata", b"scripts".to_vec())
        .entry("Graphics\\Titles\\title.png", vec![0x89, b'P', b'N', b'G', 0, 1, 2, 3])
        .entry("Audio\\BGM\\empty.mid", Vec::new())
        .build()
}

/// A small VX Ace archive with nested directories
pub fn sample_vxace_archive() -> Vec<u8> {
    MasterArchiveBuilder::new(0x1357_9BDF)
        .entry("Data\\Scripts.rvdata2", 0xCAFE_BABE, b"scripts".to_vec())
        .entry("Graphics\\System\\Window.png", 0x0BAD_F00D, vec![1, 2, 3, 4, 5, 6, 7])
        .entry("Audio\\SE\\empty.ogg", 0x1234_5678, Vec::new())
        .build()
}
