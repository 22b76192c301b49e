//! Stateful payload keystream shared by both archive generations

use crate::evolving::EvolvingKey;
use crate::repeating::RepeatingKey;

/// Keystream state for decrypting one entry payload, possibly in chunks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadCipher {
    /// XP/VX: per-byte evolving key continued from the entry's content key
    Evolving(EvolvingKey),
    /// VX Ace: repeating 4-byte key plus the number of bytes already processed
    Repeating {
        /// Entry content key
        key: RepeatingKey,
        /// Bytes consumed so far
        position: u64,
    },
}

impl PayloadCipher {
    /// Start an XP/VX payload keystream.
    pub const fn evolving(content_key: u32) -> Self {
        Self::Evolving(EvolvingKey::new(content_key))
    }

    /// Start a VX Ace payload keystream.
    pub const fn repeating(content_key: u32) -> Self {
        Self::Repeating {
            key: RepeatingKey::new(content_key),
            position: 0,
        }
    }

    /// XOR the next chunk of payload in place and move the keystream forward.
    pub fn apply_keystream(&mut self, data: &mut [u8]) {
        match self {
            Self::Evolving(key) => *key = key.apply_keystream(data),
            Self::Repeating { key, position } => {
                key.apply_keystream_at(data, *position);
                *position += data.len() as u64;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evolving_chunks_continue_keystream() {
        let mut whole = vec![0u8; 9];
        PayloadCipher::evolving(0x1234).apply_keystream(&mut whole);

        let mut cipher = PayloadCipher::evolving(0x1234);
        let mut first = vec![0u8; 4];
        let mut second = vec![0u8; 5];
        cipher.apply_keystream(&mut first);
        cipher.apply_keystream(&mut second);
        first.extend(second);

        assert_eq!(whole, first);
    }

    #[test]
    fn test_repeating_chunks_keep_phase() {
        let mut cipher = PayloadCipher::repeating(0x0403_0201);
        let mut first = [0u8; 3];
        let mut second = [0u8; 3];
        cipher.apply_keystream(&mut first);
        cipher.apply_keystream(&mut second);

        assert_eq!(first, [1, 2, 3]);
        assert_eq!(second, [4, 1, 2]);
    }
}
