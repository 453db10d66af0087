//! `sealtext salt` — print a fresh random salt for `encrypt --salt`.

use crate::cli::{load_settings, Cli};
use crate::crypto::{generate_salt, OsRandom};
use crate::errors::{Result, SealError};
use crate::frame::format::MAX_FIELD_LEN;

/// Execute the `salt` command.
pub fn execute(cli: &Cli, len: Option<usize>) -> Result<()> {
    let len = match len {
        Some(len) => len,
        None => load_settings(cli)?.salt_len,
    };
    check_len(len)?;

    println!("{}", generate_salt(&mut OsRandom, len));
    Ok(())
}

fn check_len(len: usize) -> Result<()> {
    if len == 0 || len > MAX_FIELD_LEN {
        return Err(SealError::CommandFailed(format!(
            "salt length must be between 1 and {MAX_FIELD_LEN} bytes (got {len})"
        )));
    }
    Ok(())
}
