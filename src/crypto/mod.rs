//! Cryptographic primitives for sealtext.
//!
//! This module provides:
//! - Base64url text encoding (`codec`)
//! - PBKDF2-HMAC-SHA256 key derivation (`kdf`)
//! - The HMAC-SHA256 counter-mode keystream (`keystream`)
//! - The HMAC-SHA256 integrity tag (`tag`)
//! - Injectable randomness for salts and nonces (`random`)

pub mod codec;
pub mod kdf;
pub mod keystream;
pub mod random;
pub mod tag;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{derive_key, KeystreamGenerator, OsRandom, ...};
pub use kdf::{derive, derive_key, KeyMaterial, DEFAULT_ITERATIONS, KEY_LEN};
pub use keystream::{xor, BlockProgress, KeystreamGenerator, BLOCK_LEN};
pub use random::{generate_salt, OsRandom, RandomSource};
pub use tag::TAG_LEN;
