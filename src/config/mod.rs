//! Configuration module — `.sealtext.toml` settings.

pub mod settings;

pub use settings::Settings;
