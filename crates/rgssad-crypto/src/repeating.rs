//! Repeating 4-byte XOR key used by RPG Maker VX Ace entries
//!
//! Each VX Ace entry stores its own 32-bit content key. Its little-endian
//! bytes are cycled over the entry name and payload without ever advancing,
//! so any byte can be decrypted from its position alone.

/// Per-entry content key of a VX Ace archive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RepeatingKey {
    bytes: [u8; 4],
}

impl RepeatingKey {
    /// Build from the decrypted 32-bit content key.
    pub const fn new(key: u32) -> Self {
        Self {
            bytes: key.to_le_bytes(),
        }
    }

    /// Raw 32-bit key value.
    pub const fn value(self) -> u32 {
        u32::from_le_bytes(self.bytes)
    }

    /// Little-endian key bytes `k0..k3`.
    pub const fn bytes(self) -> [u8; 4] {
        self.bytes
    }

    /// XOR `data` in place, starting at keystream position 0.
    pub fn apply_keystream(self, data: &mut [u8]) {
        self.apply_keystream_at(data, 0);
    }

    /// XOR `data` in place as if it started at byte `position` of the stream.
    pub fn apply_keystream_at(self, data: &mut [u8], position: u64) {
        let phase = (position % 4) as usize;
        for (i, byte) in data.iter_mut().enumerate() {
            *byte ^= self.bytes[(phase + i) % 4];
        }
    }
}

impl From<u32> for RepeatingKey {
    fn from(key: u32) -> Self {
        Self::new(key)
    }
}
