//! `sealtext encrypt` — encrypt text into a base64url frame.

use serde::Serialize;

use crate::cli::output::{self, Response};
use crate::cli::progress::ProgressRenderer;
use crate::cli::{cancel_token, load_settings, read_input, resolve_passphrase, Cli};
use crate::crypto::OsRandom;
use crate::errors::Result;
use crate::pipeline::{EncryptOptions, Sealer};

#[derive(Serialize)]
struct EncryptData {
    ciphertext: String,
}

/// Execute the `encrypt` command.
pub fn execute(
    cli: &Cli,
    text: Option<&str>,
    salt: Option<&str>,
    iterations: Option<u32>,
    show_progress: bool,
    json: bool,
) -> Result<()> {
    let settings = load_settings(cli)?;

    if text.is_some() && !json {
        output::warning("Text provided on command line — it may appear in shell history.");
    }
    let plaintext = read_input(text, "Text to encrypt")?;
    let passphrase = resolve_passphrase(cli, true)?;

    let options = EncryptOptions {
        salt: salt.map(str::to_string),
        iterations: iterations.unwrap_or(settings.iterations),
        cancel: cancel_token(cli),
    };

    let mut sealer = Sealer::from_settings(&settings, OsRandom);
    let mut renderer = ProgressRenderer::new(show_progress, json);
    let result = sealer.encrypt(&plaintext, &passphrase, &options, &mut renderer);
    renderer.finish();

    match result {
        Ok(ciphertext) => {
            if json {
                output::print_json(&Response::ok(EncryptData { ciphertext }))?;
            } else {
                println!("{ciphertext}");
                if show_progress {
                    output::success(&format!(
                        "Encrypted {} bytes with {} PBKDF2 iterations",
                        plaintext.len(),
                        options.iterations
                    ));
                }
            }
            Ok(())
        }
        Err(e) => {
            if json {
                output::print_json(&Response::<EncryptData>::failed(&e))?;
            }
            Err(e)
        }
    }
}
