//! Input checks performed before a pipeline starts.
//!
//! These run after the `validate` event and before any other stage, so a
//! rejected request never derives a key.

use crate::errors::{Result, SealError};

/// Minimum passphrase length in characters.
pub const MIN_PASSPHRASE_LEN: usize = 4;

/// Reject passphrases shorter than `min_len` characters.
pub fn validate_passphrase(passphrase: &str, min_len: usize) -> Result<()> {
    let len = passphrase.chars().count();
    if len < min_len {
        return Err(SealError::Validation(format!(
            "passphrase is too short ({len} characters, need at least {min_len})"
        )));
    }
    Ok(())
}

/// Checks for an encrypt request.
pub fn validate_encrypt(
    plaintext: &str,
    passphrase: &str,
    iterations: u32,
    min_passphrase_len: usize,
) -> Result<()> {
    validate_passphrase(passphrase, min_passphrase_len)?;

    if plaintext.is_empty() {
        return Err(SealError::Validation("cannot encrypt empty text".into()));
    }

    if iterations == 0 {
        return Err(SealError::Validation(
            "iteration count must be at least 1".into(),
        ));
    }

    Ok(())
}

/// Checks for a decrypt request.
pub fn validate_decrypt(ciphertext: &str, passphrase: &str, min_passphrase_len: usize) -> Result<()> {
    validate_passphrase(passphrase, min_passphrase_len)?;

    if ciphertext.trim().is_empty() {
        return Err(SealError::Validation("ciphertext is empty".into()));
    }

    Ok(())
}
