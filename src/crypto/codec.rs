//! Base64url text encoding for frames and salts.
//!
//! Output uses the RFC 4648 §5 alphabet without padding.  Input is
//! accepted with or without padding, and the standard `+`/`/` characters
//! are treated as `-`/`_` so text pasted from a plain base64 tool still
//! decodes.

use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;

use crate::errors::{Result, SealError};

/// Encode raw bytes as unpadded base64url.
pub fn encode(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode base64url text back to raw bytes.
///
/// Surrounding whitespace is ignored and padding is restored to a
/// multiple of four characters before decoding.
pub fn decode(text: &str) -> Result<Vec<u8>> {
    let mut normalized: String = text
        .trim()
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();

    // Strip any padding the caller supplied so we can restore it exactly.
    while normalized.ends_with('=') {
        normalized.pop();
    }

    let rem = normalized.len() % 4;
    if rem != 0 {
        normalized.push_str(&"=".repeat(4 - rem));
    }

    URL_SAFE
        .decode(normalized.as_bytes())
        .map_err(|e| SealError::Format(format!("invalid base64url: {e}")))
}
