//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;
pub mod progress;

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};
use clap_complete::Shell;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{Result, SealError};
use crate::pipeline::CancellationToken;

/// sealtext CLI: passphrase text encryption.
#[derive(Parser)]
#[command(
    name = "sealtext",
    about = "Passphrase text encryption with PBKDF2 and an HMAC-SHA256 keystream",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Passphrase (prompted for when omitted)
    #[arg(long, env = "SEALTEXT_PASSPHRASE", hide_env_values = true, global = true)]
    pub passphrase: Option<String>,

    /// Directory holding .sealtext.toml (default: current directory)
    #[arg(long, global = true)]
    pub config_dir: Option<String>,

    /// Give up after this many seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Encrypt text into a base64url frame
    Encrypt {
        /// Text to encrypt (reads stdin or prompts when omitted)
        text: Option<String>,

        /// Salt as base64url (random when omitted)
        #[arg(long)]
        salt: Option<String>,

        /// PBKDF2 iteration count (default from config: 120000)
        #[arg(short, long)]
        iterations: Option<u32>,

        /// Show pipeline progress on stderr
        #[arg(short, long)]
        progress: bool,

        /// Print a JSON response instead of plain text
        #[arg(long)]
        json: bool,
    },

    /// Decrypt a base64url frame back to text
    Decrypt {
        /// Ciphertext (reads stdin or prompts when omitted)
        text: Option<String>,

        /// Show pipeline progress on stderr
        #[arg(short, long)]
        progress: bool,

        /// Print a JSON response instead of plain text
        #[arg(long)]
        json: bool,
    },

    /// Print a fresh random salt (base64url)
    Salt {
        /// Salt length in bytes (default from config: 12)
        #[arg(short, long)]
        len: Option<usize>,
    },

    /// Generate a random password
    Genpass {
        /// Password length (6-128)
        #[arg(short, long, default_value = "16")]
        length: usize,

        /// Leave out uppercase letters
        #[arg(long)]
        no_upper: bool,

        /// Leave out digits
        #[arg(long)]
        no_digits: bool,

        /// Include symbols
        #[arg(long)]
        symbols: bool,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Install the tracing subscriber.  `RUST_LOG` wins over `-v`.
pub fn init_logging(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // A second init (e.g. in tests) is harmless, so the error is ignored.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Load `.sealtext.toml` from `--config-dir` or the working directory.
pub fn load_settings(cli: &Cli) -> Result<Settings> {
    let dir = match &cli.config_dir {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir()?,
    };
    Settings::load(&dir)
}

/// Cancellation token honouring `--timeout`.
pub fn cancel_token(cli: &Cli) -> CancellationToken {
    match cli.timeout {
        Some(secs) => CancellationToken::with_timeout(Duration::from_secs(secs)),
        None => CancellationToken::new(),
    }
}

/// Get the passphrase, trying in order:
/// 1. `--passphrase` / `SEALTEXT_PASSPHRASE`
/// 2. Interactive prompt (with confirmation when `confirm` is set)
///
/// Returns `Zeroizing<String>` so the passphrase is wiped from memory on drop.
pub fn resolve_passphrase(cli: &Cli, confirm: bool) -> Result<Zeroizing<String>> {
    if let Some(pw) = &cli.passphrase {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw.clone()));
        }
    }

    let prompt = dialoguer::Password::new().with_prompt("Passphrase");
    let prompt = if confirm {
        prompt.with_confirmation("Confirm passphrase", "Passphrases do not match, try again")
    } else {
        prompt
    };

    let pw = prompt
        .interact()
        .map_err(|e| SealError::CommandFailed(format!("passphrase prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Get the command's text input from one of three sources.
pub fn read_input(arg: Option<&str>, prompt: &str) -> Result<String> {
    if let Some(text) = arg {
        // Source 1: Inline value on the command line.
        return Ok(text.to_string());
    }

    if !io::stdin().is_terminal() {
        // Source 2: Piped input.  Only the final line break is dropped.
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        return Ok(strip_line_break(buf));
    }

    // Source 3: Interactive prompt.
    dialoguer::Input::<String>::new()
        .with_prompt(prompt)
        .interact_text()
        .map_err(|e| SealError::CommandFailed(format!("input prompt: {e}")))
}

fn strip_line_break(mut text: String) -> String {
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
    text
}
