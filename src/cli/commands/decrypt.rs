//! `sealtext decrypt` — recover text from a base64url frame.

use serde::Serialize;

use crate::cli::output::{self, Response};
use crate::cli::progress::ProgressRenderer;
use crate::cli::{cancel_token, load_settings, read_input, resolve_passphrase, Cli};
use crate::crypto::OsRandom;
use crate::errors::{Result, SealError};
use crate::pipeline::{DecryptOptions, Sealer};

#[derive(Serialize)]
struct DecryptData {
    plaintext: String,
}

/// Execute the `decrypt` command.
pub fn execute(cli: &Cli, text: Option<&str>, show_progress: bool, json: bool) -> Result<()> {
    let settings = load_settings(cli)?;
    let ciphertext = read_input(text, "Ciphertext")?;
    let passphrase = resolve_passphrase(cli, false)?;

    let options = DecryptOptions {
        cancel: cancel_token(cli),
    };

    let sealer = Sealer::from_settings(&settings, OsRandom);
    let mut renderer = ProgressRenderer::new(show_progress, json);
    let result = sealer.decrypt(&ciphertext, &passphrase, &options, &mut renderer);
    renderer.finish();

    match result {
        Ok(plaintext) => {
            if json {
                output::print_json(&Response::ok(DecryptData { plaintext }))?;
            } else {
                println!("{plaintext}");
            }
            Ok(())
        }
        Err(e) => {
            if json {
                output::print_json(&Response::<DecryptData>::failed(&e))?;
            } else if matches!(e, SealError::Integrity) {
                output::tip("A wrong passphrase and a modified ciphertext fail the same way.");
            }
            Err(e)
        }
    }
}
