//! # uniqueid-id
//!
//! Identifier tokens for persistent objects.
//!
//! ## Design Principles
//!
//! - Identifiers are opaque strings; nothing downstream parses them
//! - Once minted and stored, an identifier never changes
//! - Generation is a pluggable collaborator, never hard-wired into storage
//!
//! ## Generators
//!
//! - [`RandomIdGenerator`]: 128 random bits, 22-char URL-safe base64 (default)
//! - [`UlidIdGenerator`]: 26-char ULID, sortable by creation time

mod error;
mod generator;
mod types;

pub use error::IdError;
pub use generator::{IdGenerator, RandomIdGenerator, UlidIdGenerator};
pub use types::*;
