//! `sealtext genpass` — generate a random password.
//!
//! One character is drawn from every enabled class so each class is
//! guaranteed to appear, the rest come from the union of all classes,
//! and the result is shuffled.  This is a convenience for picking a
//! passphrase; salts and nonces never come from here.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::errors::{Result, SealError};

const LOWER: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"!@#$%^&*()-_=+[]{};:,.<>?";

/// Allowed password lengths.
pub const MIN_LENGTH: usize = 6;
pub const MAX_LENGTH: usize = 128;

/// Which character classes to draw from.  Lowercase is always included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Charset {
    pub upper: bool,
    pub digits: bool,
    pub symbols: bool,
}

impl Default for Charset {
    fn default() -> Self {
        Self {
            upper: true,
            digits: true,
            symbols: false,
        }
    }
}

impl Charset {
    fn classes(&self) -> Vec<&'static [u8]> {
        let mut classes = vec![LOWER];
        if self.upper {
            classes.push(UPPER);
        }
        if self.digits {
            classes.push(DIGITS);
        }
        if self.symbols {
            classes.push(SYMBOLS);
        }
        classes
    }
}

/// Execute the `genpass` command.
pub fn execute(length: usize, no_upper: bool, no_digits: bool, symbols: bool) -> Result<()> {
    let charset = Charset {
        upper: !no_upper,
        digits: !no_digits,
        symbols,
    };
    let password = generate(length, charset, &mut rand::rng())?;
    println!("{password}");
    Ok(())
}

/// Build a password of `length` characters from `charset`.
pub fn generate<R: Rng + ?Sized>(length: usize, charset: Charset, rng: &mut R) -> Result<String> {
    if !(MIN_LENGTH..=MAX_LENGTH).contains(&length) {
        return Err(SealError::CommandFailed(format!(
            "password length must be between {MIN_LENGTH} and {MAX_LENGTH} (got {length})"
        )));
    }

    let classes = charset.classes();
    let all: Vec<u8> = classes.concat();

    let mut out: Vec<u8> = classes
        .iter()
        .map(|class| class[rng.random_range(0..class.len())])
        .collect();
    while out.len() < length {
        out.push(all[rng.random_range(0..all.len())]);
    }
    out.shuffle(rng);

    // Every class is ASCII, so this cannot fail.
    String::from_utf8(out).map_err(|e| SealError::CommandFailed(format!("password: {e}")))
}
