//! Password-based key derivation using PBKDF2-HMAC-SHA256.
//!
//! The iteration count travels inside every frame, so decryption always
//! derives with the same cost the encryptor chose.  Nothing here enforces
//! a minimum; the pipeline's validation layer decides what to accept.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::Zeroize;

/// Length of the derived key in bytes (256 bits).
pub const KEY_LEN: usize = 32;

/// Default PBKDF2 iteration count.
pub const DEFAULT_ITERATIONS: u32 = 120_000;

/// Derive `output_len` bytes from a passphrase and salt.
///
/// Pure function of its inputs: the same passphrase, salt, iteration
/// count and length always produce the same bytes.  An iteration count
/// of zero is run as a single round.
pub fn derive(passphrase: &[u8], salt: &[u8], iterations: u32, output_len: usize) -> Vec<u8> {
    let mut out = vec![0u8; output_len];
    pbkdf2_hmac::<Sha256>(passphrase, salt, iterations.max(1), &mut out);
    out
}

/// Derive the fixed-size key used by the rest of the pipeline.
pub fn derive_key(passphrase: &[u8], salt: &[u8], iterations: u32) -> KeyMaterial {
    let mut bytes = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(passphrase, salt, iterations.max(1), &mut bytes);
    let key = KeyMaterial::new(bytes);
    bytes.zeroize();
    key
}

/// A derived 32-byte key that is wiped from memory when dropped.
///
/// One `KeyMaterial` lives for exactly one encrypt or decrypt call.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct KeyMaterial {
    bytes: [u8; KEY_LEN],
}

impl KeyMaterial {
    /// Wrap raw key bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Access the raw key bytes (for HMAC keying).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_rfc7914_pbkdf2_sha256_vector() {
        // RFC 7914 §11: P="passwd", S="salt", c=1, dkLen=64.
        let out = derive(b"passwd", b"salt", 1, 64);
        let expected: [u8; 16] = [
            0x55, 0xac, 0x04, 0x6e, 0x56, 0xe3, 0x08, 0x9f, 0xec, 0x16, 0x91, 0xc2, 0x25, 0x44,
            0xb6, 0x05,
        ];
        assert_eq!(&out[..16], &expected);
    }

    #[test]
    fn derive_is_deterministic() {
        let a = derive(b"correct-horse", b"salt1234", 1_000, KEY_LEN);
        let b = derive(b"correct-horse", b"salt1234", 1_000, KEY_LEN);
        assert_eq!(a, b);
    }

    #[test]
    fn derive_key_matches_derive() {
        let key = derive_key(b"correct-horse", b"salt1234", 1_000);
        let raw = derive(b"correct-horse", b"salt1234", 1_000, KEY_LEN);
        assert_eq!(key.as_bytes().as_slice(), raw.as_slice());
    }

    #[test]
    fn different_salts_different_keys() {
        let a = derive(b"pass", b"salt-a", 10, KEY_LEN);
        let b = derive(b"pass", b"salt-b", 10, KEY_LEN);
        assert_ne!(a, b);
    }

    #[test]
    fn different_iterations_different_keys() {
        let a = derive(b"pass", b"salt", 10, KEY_LEN);
        let b = derive(b"pass", b"salt", 11, KEY_LEN);
        assert_ne!(a, b);
    }

    #[test]
    fn zero_iterations_runs_one_round() {
        assert_eq!(derive(b"pass", b"salt", 0, KEY_LEN), derive(b"pass", b"salt", 1, KEY_LEN));
    }

    #[test]
    fn debug_redacts_key_bytes() {
        let key = KeyMaterial::new([0x42; KEY_LEN]);
        let shown = format!("{key:?}");
        assert!(shown.contains("REDACTED"));
        assert!(!shown.contains("66"));
    }
}
