//! Integrity tag over the serialized header and ciphertext.
//!
//! The tag is `HMAC-SHA256(key, header || ciphertext)` using the same
//! derived key as the keystream.  Because the tag covers the header, the
//! iteration count, salt and nonce cannot be altered without detection.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::errors::{Result, SealError};

/// Size of the HMAC tag appended to every frame (SHA-256 = 32 bytes).
pub const TAG_LEN: usize = 32;

/// Compute the tag over `header || ciphertext`.
pub fn compute(key: &[u8], header: &[u8], ciphertext: &[u8]) -> Result<[u8; TAG_LEN]> {
    let mut mac = Hmac::<Sha256>::new_from_slice(key)
        .map_err(|e| SealError::HmacError(format!("invalid HMAC key: {e}")))?;

    mac.update(header);
    mac.update(ciphertext);

    let mut tag = [0u8; TAG_LEN];
    tag.copy_from_slice(&mac.finalize().into_bytes());
    Ok(tag)
}

/// Recompute the tag and compare it with `candidate` in constant time.
///
/// A candidate of the wrong length never matches.
pub fn verify(key: &[u8], header: &[u8], ciphertext: &[u8], candidate: &[u8]) -> Result<bool> {
    let expected = compute(key, header, ciphertext)?;
    Ok(expected.as_slice().ct_eq(candidate).into())
}

/// Like `verify`, but turns a mismatch into `SealError::Integrity`.
///
/// The error does not say whether the passphrase was wrong or the data
/// was modified; both look the same from here.
pub fn ensure_valid(key: &[u8], header: &[u8], ciphertext: &[u8], candidate: &[u8]) -> Result<()> {
    if verify(key, header, ciphertext, candidate)? {
        Ok(())
    } else {
        Err(SealError::Integrity)
    }
}
