//! Randomness used for salts and nonces.
//!
//! The pipeline never reaches for a global RNG directly; it asks a
//! `RandomSource`.  Production code uses `OsRandom`, tests inject a
//! deterministic source to get reproducible frames.

use rand::RngCore;

/// Default salt length in bytes.
pub const DEFAULT_SALT_LEN: usize = 12;

/// Default nonce length in bytes.
pub const DEFAULT_NONCE_LEN: usize = 12;

/// Anything that can fill a buffer with random bytes.
pub trait RandomSource {
    fn fill_bytes(&mut self, buf: &mut [u8]);
}

/// Cryptographically secure randomness from the OS-seeded thread RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill_bytes(&mut self, buf: &mut [u8]) {
        rand::rng().fill_bytes(buf);
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn fill_bytes(&mut self, buf: &mut [u8]) {
        (**self).fill_bytes(buf);
    }
}

/// Draw `len` random bytes from `rng`.
pub fn random_bytes(rng: &mut dyn RandomSource, len: usize) -> Vec<u8> {
    let mut buf = vec![0u8; len];
    rng.fill_bytes(&mut buf);
    buf
}

/// Generate a random salt and return it as base64url text.
pub fn generate_salt(rng: &mut dyn RandomSource, len: usize) -> String {
    super::codec::encode(&random_bytes(rng, len))
}
