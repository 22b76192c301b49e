//! Evolving key schedule used by RPG Maker XP and VX archives
//!
//! Every decrypted table integer and every decrypted byte (filename or
//! payload) consumes exactly one step of the `key * 7 + 3` sequence. The key
//! is a plain `Copy` value: each operation hands back the advanced key so the
//! caller threads it through the decode loop explicitly.
//!
//! ```
//! use rgssad_crypto::EvolvingKey;
//!
//! let key = EvolvingKey::seeded();
//! let (len, key) = key.apply_u32(0xDEAD_CAFE ^ 5);
//! assert_eq!(len, 5);
//!
//! let mut name = *b"\x00\x00";
//! let key = key.apply_keystream(&mut name);
//! assert_eq!(key, EvolvingKey::seeded().advance_by(3));
//! ```

use crate::keys::{RGSSAD_V1_SEED, advance_key, advance_key_by};

/// One position in the evolving key sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EvolvingKey(u32);

impl EvolvingKey {
    /// Wrap an arbitrary key value (e.g. a stored per-entry content key).
    pub const fn new(key: u32) -> Self {
        Self(key)
    }

    /// Key at the start of every XP/VX directory table.
    pub const fn seeded() -> Self {
        Self(RGSSAD_V1_SEED)
    }

    /// Raw 32-bit key value.
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Next key in the sequence.
    #[must_use]
    pub const fn advance(self) -> Self {
        Self(advance_key(self.0))
    }

    /// Key after `steps` advances.
    #[must_use]
    pub fn advance_by(self, steps: u64) -> Self {
        Self(advance_key_by(self.0, steps))
    }

    /// XOR a 32-bit table field with the current key and advance once.
    ///
    /// The XOR is symmetric, so the same call encrypts and decrypts.
    pub const fn apply_u32(self, raw: u32) -> (u32, Self) {
        (raw ^ self.0, self.advance())
    }

    /// XOR each byte with the low byte of the key, advancing after every byte.
    ///
    /// Returns the key positioned after the last byte.
    #[must_use]
    pub fn apply_keystream(self, data: &mut [u8]) -> Self {
        let mut key = self.0;
        for byte in data {
            *byte ^= (key & 0xFF) as u8;
            key = advance_key(key);
        }
        Self(key)
    }
}

impl From<u32> for EvolvingKey {
    fn from(key: u32) -> Self {
        Self(key)
    }
}
