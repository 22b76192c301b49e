//! Format-defined constants and key derivation

/// Seed of the evolving key used by RPG Maker XP and VX archives
pub const RGSSAD_V1_SEED: u32 = 0xDEAD_CAFE;

/// Multiplier of the linear-congruential key step shared by every format
pub const KEY_STEP_MULTIPLIER: u32 = 7;

/// Increment of the linear-congruential key step
pub const KEY_STEP_INCREMENT: u32 = 3;

/// Advance a key by one linear-congruential step (`key * 7 + 3`, wrapping).
pub const fn advance_key(key: u32) -> u32 {
    key.wrapping_mul(KEY_STEP_MULTIPLIER)
        .wrapping_add(KEY_STEP_INCREMENT)
}

/// Advance a key by `steps` linear-congruential steps.
pub fn advance_key_by(mut key: u32, steps: u64) -> u32 {
    for _ in 0..steps {
        key = advance_key(key);
    }
    key
}

/// Derive the RPG Maker VX Ace master key from the seed stored after the header.
///
/// The master key is `seed * 9 + 3` with wrapping arithmetic and stays fixed
/// for the whole directory table.
pub const fn derive_master_key(seed: u32) -> u32 {
    seed.wrapping_mul(9).wrapping_add(3)
}

/// Fixed key that obfuscates every integer of a VX Ace directory table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MasterKey(u32);

impl MasterKey {
    /// Derive the master key from the header seed.
    pub const fn from_seed(seed: u32) -> Self {
        Self(derive_master_key(seed))
    }

    /// Raw 32-bit key value.
    pub const fn value(self) -> u32 {
        self.0
    }

    /// XOR a table integer with the master key. The key is never advanced.
    pub const fn apply_u32(self, raw: u32) -> u32 {
        raw ^ self.0
    }
}
