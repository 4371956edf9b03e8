//! # zframe core
//!
//! Shared error taxonomy, decoder configuration and collaborator traits for
//! the zframe Zstandard framing codec.
//!
//! ## Design
//!
//! - **Typed failures**: every malformed field maps to a distinct [`Error`]
//!   variant; nothing is silently coerced to a default
//! - **Pure parsing**: codecs hold no state beyond an input cursor
//! - **Explicit seams**: checksums and entropy decoding are reached through
//!   traits, never implemented here

pub mod config;
pub mod error;
pub mod traits;

pub use config::{DecoderConfig, WindowFormula, MAX_BLOCK_SIZE};
pub use error::{Error, Result};
pub use traits::ContentHasher;
