//! Counter-mode keystream built from HMAC-SHA256.
//!
//! Block `i` is `HMAC-SHA256(key, salt || nonce || BE32(i))`, counting
//! from zero.  Blocks are concatenated and truncated to the data length,
//! then XORed with the data.  The same (key, nonce) pair must never be
//! used for two different messages: the XOR of the two ciphertexts would
//! equal the XOR of the two plaintexts.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::errors::{Result, SealError};

type HmacSha256 = Hmac<Sha256>;

/// Size of one keystream block (SHA-256 output).
pub const BLOCK_LEN: usize = 32;

/// Progress after one keystream block has been produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockProgress {
    /// Number of blocks completed so far (1-based).
    pub done: usize,
    /// Total number of blocks for this call.
    pub blocks: usize,
    /// `round(100 * done / blocks)`.
    pub percent: u8,
}

/// Number of blocks reported for `total` bytes.
///
/// Zero-length data still counts as one block so progress always has
/// something to report.
pub fn block_count(total: usize) -> usize {
    total.div_ceil(BLOCK_LEN).max(1)
}

/// Round-half-up percentage of `done` out of `blocks`.
fn percent(done: usize, blocks: usize) -> u8 {
    let (done, blocks) = (done as u64, blocks as u64);
    ((200 * done + blocks) / (2 * blocks)).min(100) as u8
}

/// HMAC-keyed keystream for one (key, salt, nonce) triple.
pub struct KeystreamGenerator<'a> {
    mac: HmacSha256,
    salt: &'a [u8],
    nonce: &'a [u8],
}

impl<'a> KeystreamGenerator<'a> {
    pub fn new(key: &[u8], salt: &'a [u8], nonce: &'a [u8]) -> Result<Self> {
        let mac = HmacSha256::new_from_slice(key)
            .map_err(|e| SealError::HmacError(format!("invalid HMAC key: {e}")))?;
        Ok(Self { mac, salt, nonce })
    }

    /// Compute block `counter`.
    pub fn block(&self, counter: u32) -> [u8; BLOCK_LEN] {
        let mut mac = self.mac.clone();
        mac.update(self.salt);
        mac.update(self.nonce);
        mac.update(&counter.to_be_bytes());

        let mut out = [0u8; BLOCK_LEN];
        out.copy_from_slice(&mac.finalize().into_bytes());
        out
    }

    /// Produce exactly `total` keystream bytes.
    pub fn generate(&self, total: usize) -> Result<Zeroizing<Vec<u8>>> {
        self.generate_with(total, |_| Ok(()))
    }

    /// Produce exactly `total` keystream bytes, calling `on_block` after
    /// each block.  An error from the callback stops generation and is
    /// returned as-is.
    pub fn generate_with<F>(&self, total: usize, mut on_block: F) -> Result<Zeroizing<Vec<u8>>>
    where
        F: FnMut(BlockProgress) -> Result<()>,
    {
        let blocks = block_count(total);
        let counter_limit = u32::try_from(blocks).map_err(|_| {
            SealError::Validation(format!(
                "{total} bytes exceeds the keystream counter range"
            ))
        })?;

        let mut stream = Zeroizing::new(Vec::with_capacity(blocks * BLOCK_LEN));
        for counter in 0..counter_limit {
            let block = Zeroizing::new(self.block(counter));
            stream.extend_from_slice(block.as_slice());

            let done = counter as usize + 1;
            on_block(BlockProgress {
                done,
                blocks,
                percent: percent(done, blocks),
            })?;
        }

        stream.truncate(total);
        Ok(stream)
    }
}

/// Convenience wrapper: `total` keystream bytes for the given inputs.
pub fn generate(
    key: &[u8],
    salt: &[u8],
    nonce: &[u8],
    total: usize,
) -> Result<Zeroizing<Vec<u8>>> {
    KeystreamGenerator::new(key, salt, nonce)?.generate(total)
}

/// XOR `data` with an equal-length keystream.
pub fn xor(data: &[u8], keystream: &[u8]) -> Vec<u8> {
    debug_assert_eq!(data.len(), keystream.len());
    data.iter().zip(keystream).map(|(d, k)| d ^ k).collect()
}
