//! Frame module — the versioned binary container for ciphertext.
//!
//! This module provides:
//! - Header serialization and frame assembly/parsing (`format`)

pub mod format;

// Re-export the most commonly used items.
pub use format::{assemble, build_header, parse, FrameHeader, ParsedFrame, CURRENT_VERSION};
