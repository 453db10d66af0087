//! Binary frame format produced by encrypt and consumed by decrypt.
//!
//! A frame has this layout:
//!
//! ```text
//! [version: 1][iterations: 4 BE][salt_len: 1][salt][nonce_len: 1][nonce][ciphertext][tag: 32]
//! ```
//!
//! - **Version**: format version (currently `1`, no fallback for others).
//! - **Iterations**: big-endian u32 PBKDF2 iteration count.
//! - **Salt / nonce**: each prefixed by a one-byte length.
//! - **Ciphertext**: everything between the header and the tag.
//! - **Tag**: 32-byte HMAC-SHA256 over header + ciphertext.

use crate::crypto::TAG_LEN;
use crate::errors::{Result, SealError};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Current frame format version.
pub const CURRENT_VERSION: u8 = 1;

/// Header size with empty salt and nonce: version + iterations + two length bytes.
pub const FIXED_HEADER_LEN: usize = 1 + 4 + 1 + 1;

/// Smallest buffer that can possibly be a frame.
pub const MIN_FRAME_LEN: usize = FIXED_HEADER_LEN + TAG_LEN;

/// Longest salt or nonce the one-byte length prefix can describe.
pub const MAX_FIELD_LEN: usize = u8::MAX as usize;

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

/// The fields that precede the ciphertext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameHeader {
    pub version: u8,
    pub iterations: u32,
    pub salt: Vec<u8>,
    pub nonce: Vec<u8>,
}

impl FrameHeader {
    /// A header for the current format version.
    pub fn new(iterations: u32, salt: Vec<u8>, nonce: Vec<u8>) -> Self {
        Self {
            version: CURRENT_VERSION,
            iterations,
            salt,
            nonce,
        }
    }

    /// Serialized length of this header.
    pub fn encoded_len(&self) -> usize {
        FIXED_HEADER_LEN + self.salt.len() + self.nonce.len()
    }

    /// Serialize the header in wire order.
    pub fn to_bytes(&self) -> Vec<u8> {
        build_header(self.version, self.iterations, &self.salt, &self.nonce)
    }
}

/// Serialize header fields in wire order.
///
/// # Panics
///
/// Panics if `salt` or `nonce` is longer than 255 bytes.  Callers size
/// these from validated settings, so a longer value is a bug.
pub fn build_header(version: u8, iterations: u32, salt: &[u8], nonce: &[u8]) -> Vec<u8> {
    assert!(salt.len() <= MAX_FIELD_LEN, "salt longer than 255 bytes");
    assert!(nonce.len() <= MAX_FIELD_LEN, "nonce longer than 255 bytes");

    let mut buf = Vec::with_capacity(FIXED_HEADER_LEN + salt.len() + nonce.len());
    buf.push(version); // 1 byte
    buf.extend_from_slice(&iterations.to_be_bytes()); // 4 bytes BE
    buf.push(salt.len() as u8); // 1 byte
    buf.extend_from_slice(salt);
    buf.push(nonce.len() as u8); // 1 byte
    buf.extend_from_slice(nonce);
    buf
}

/// Concatenate header, ciphertext and tag into one frame.
pub fn assemble(header: &[u8], ciphertext: &[u8], tag: &[u8; TAG_LEN]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(header.len() + ciphertext.len() + TAG_LEN);
    buf.extend_from_slice(header);
    buf.extend_from_slice(ciphertext);
    buf.extend_from_slice(tag);
    buf
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// A frame split into its parts, borrowing from the decoded buffer.
///
/// `header` keeps the exact serialized header bytes so the tag is
/// checked over what was received, not over a re-serialization.
#[derive(Debug, Clone, Copy)]
pub struct ParsedFrame<'a> {
    pub version: u8,
    pub iterations: u32,
    pub salt: &'a [u8],
    pub nonce: &'a [u8],
    pub header: &'a [u8],
    pub ciphertext: &'a [u8],
    pub tag: &'a [u8],
}

impl ParsedFrame<'_> {
    /// Owned copy of the header fields.
    pub fn to_header(&self) -> FrameHeader {
        FrameHeader {
            version: self.version,
            iterations: self.iterations,
            salt: self.salt.to_vec(),
            nonce: self.nonce.to_vec(),
        }
    }
}

/// Bounds-checked sequential reader over a frame buffer.
struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn take(&mut self, len: usize, what: &str) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| SealError::Format(format!("frame truncated in {what}")))?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn byte(&mut self, what: &str) -> Result<u8> {
        Ok(self.take(1, what)?[0])
    }
}

/// Split a decoded frame into its parts.
///
/// Fails with `SealError::Format` on an unsupported version, on any
/// field running past the end of the buffer, or when fewer than 32
/// bytes remain for the tag.
pub fn parse(frame: &[u8]) -> Result<ParsedFrame<'_>> {
    let mut cur = Cursor { data: frame, pos: 0 };

    let version = cur.byte("version")?;
    if version != CURRENT_VERSION {
        return Err(SealError::Format(format!(
            "unsupported version {version}, expected {CURRENT_VERSION}"
        )));
    }

    let iterations_bytes: [u8; 4] = cur
        .take(4, "iteration count")?
        .try_into()
        .map_err(|_| SealError::Format("bad iteration count".into()))?;
    let iterations = u32::from_be_bytes(iterations_bytes);

    let salt_len = cur.byte("salt length")?;
    let salt = cur.take(usize::from(salt_len), "salt")?;

    let nonce_len = cur.byte("nonce length")?;
    let nonce = cur.take(usize::from(nonce_len), "nonce")?;

    let header_end = cur.pos;
    let ciphertext_len = frame
        .len()
        .checked_sub(header_end + TAG_LEN)
        .ok_or_else(|| SealError::Format("frame too short to hold a tag".into()))?;

    let ciphertext = cur.take(ciphertext_len, "ciphertext")?;
    let tag = cur.take(TAG_LEN, "tag")?;

    Ok(ParsedFrame {
        version,
        iterations,
        salt,
        nonce,
        header: &frame[..header_end],
        ciphertext,
        tag,
    })
}
