use thiserror::Error;

/// All errors that can occur in sealtext.
#[derive(Debug, Error)]
pub enum SealError {
    // --- Pipeline errors ---
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Malformed ciphertext: {0}")]
    Format(String),

    #[error("Tag mismatch — wrong passphrase or tampered data")]
    Integrity,

    #[error("Operation cancelled")]
    Cancelled,

    #[error("HMAC error: {0}")]
    HmacError(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

impl SealError {
    /// Short machine-friendly name of the error kind, used in JSON output.
    pub fn kind(&self) -> &'static str {
        match self {
            SealError::Validation(_) => "validation",
            SealError::Format(_) => "format",
            SealError::Integrity => "integrity",
            SealError::Cancelled => "cancelled",
            SealError::HmacError(_) => "hmac",
            SealError::ConfigError(_) => "config",
            SealError::Io(_) => "io",
            SealError::SerializationError(_) => "serialization",
            SealError::CommandFailed(_) => "command",
        }
    }
}

/// Convenience type alias for sealtext results.
pub type Result<T> = std::result::Result<T, SealError>;
