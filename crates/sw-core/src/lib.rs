//! sw-core: shared error type, media-domain enums, presets and configuration.
//!
//! This crate is the foundational dependency for the other sw-* crates. It
//! carries no decision logic of its own.

pub mod config;
pub mod error;
pub mod media;
pub mod preset;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result};
pub use media::*;
pub use preset::TranscodingPreset;
