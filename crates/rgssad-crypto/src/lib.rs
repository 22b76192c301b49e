//! Key schedules for RPG Maker RGSSAD archives
//!
//! RGSSAD containers are obfuscated with simple XOR keystreams rather than
//! real encryption. This crate holds the two schedules and their constants:
//!
//! - **Evolving key** (XP `.rgssad`, VX `.rgss2a`): a single 32-bit key seeded
//!   with `0xDEADCAFE` and advanced by `key * 7 + 3` after every decrypted
//!   integer and every decrypted byte.
//! - **Master key + repeating key** (VX Ace `.rgss3a`): a fixed master key
//!   (`seed * 9 + 3`) for directory integers and a per-entry 4-byte key cycled
//!   over names and payloads.
//!
//! XOR is symmetric, so every `apply_*` operation both encrypts and decrypts.
//!
//! # Examples
//!
//! ```
//! use rgssad_crypto::{PayloadCipher, RepeatingKey};
//!
//! let mut data = *b"hello";
//! RepeatingKey::new(0x0102_0304).apply_keystream(&mut data);
//! RepeatingKey::new(0x0102_0304).apply_keystream(&mut data);
//! assert_eq!(&data, b"hello");
//!
//! let mut cipher = PayloadCipher::evolving(0xDEAD_CAFE);
//! let mut chunk = [0u8; 16];
//! cipher.apply_keystream(&mut chunk);
//! ```

#![warn(missing_docs)]

pub mod evolving;
pub mod keys;
pub mod payload;
pub mod repeating;

pub use evolving::EvolvingKey;
pub use keys::{MasterKey, RGSSAD_V1_SEED, advance_key, derive_master_key};
pub use payload::PayloadCipher;
pub use repeating::RepeatingKey;
