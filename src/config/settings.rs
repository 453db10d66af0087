use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::crypto::random::{DEFAULT_NONCE_LEN, DEFAULT_SALT_LEN};
use crate::crypto::DEFAULT_ITERATIONS;
use crate::errors::{Result, SealError};
use crate::frame::format::MAX_FIELD_LEN;
use crate::pipeline::validation::MIN_PASSPHRASE_LEN;

/// Configuration loaded from `.sealtext.toml`.
///
/// Every field has a default, so sealtext works without any config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// PBKDF2 iteration count used when encrypting (default: 120 000).
    #[serde(default = "default_iterations")]
    pub iterations: u32,

    /// Length of generated salts in bytes (default: 12).
    #[serde(default = "default_salt_len")]
    pub salt_len: usize,

    /// Length of generated nonces in bytes (default: 12).
    #[serde(default = "default_nonce_len")]
    pub nonce_len: usize,

    /// Shortest passphrase accepted, in characters (default and floor: 4).
    #[serde(default = "default_min_passphrase_len")]
    pub min_passphrase_len: usize,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_iterations() -> u32 {
    DEFAULT_ITERATIONS
}

fn default_salt_len() -> usize {
    DEFAULT_SALT_LEN
}

fn default_nonce_len() -> usize {
    DEFAULT_NONCE_LEN
}

fn default_min_passphrase_len() -> usize {
    MIN_PASSPHRASE_LEN
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            salt_len: default_salt_len(),
            nonce_len: default_nonce_len(),
            min_passphrase_len: default_min_passphrase_len(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the working directory.
    pub const FILE_NAME: &'static str = ".sealtext.toml";

    /// Load settings from `<dir>/.sealtext.toml`.
    ///
    /// If the file does not exist, defaults are returned.  If it exists
    /// but cannot be parsed or holds out-of-range values, an error is
    /// returned.
    pub fn load(dir: &Path) -> Result<Self> {
        let config_path = dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            SealError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;
        settings.validate()?;

        tracing::debug!(path = %config_path.display(), ?settings, "loaded config");
        Ok(settings)
    }

    /// Check that every value fits the frame format.
    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(SealError::ConfigError(
                "iterations must be at least 1".into(),
            ));
        }
        if self.salt_len > MAX_FIELD_LEN {
            return Err(SealError::ConfigError(format!(
                "salt_len must be at most {MAX_FIELD_LEN} (got {})",
                self.salt_len
            )));
        }
        if self.nonce_len > MAX_FIELD_LEN {
            return Err(SealError::ConfigError(format!(
                "nonce_len must be at most {MAX_FIELD_LEN} (got {})",
                self.nonce_len
            )));
        }
        if self.min_passphrase_len < MIN_PASSPHRASE_LEN {
            return Err(SealError::ConfigError(format!(
                "min_passphrase_len must be at least {MIN_PASSPHRASE_LEN} (got {})",
                self.min_passphrase_len
            )));
        }
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────────
