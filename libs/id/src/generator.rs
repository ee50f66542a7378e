//! Identifier generators.
//!
//! The store only ever calls [`IdGenerator::generate`]; which algorithm mints
//! the token is the caller's choice.

use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use ulid::Ulid;
use uuid::Uuid;

use crate::UniqueId;

/// Produces fresh identifiers.
///
/// Implementations must be safe to call from many threads at once and should
/// return a distinct token on every call with overwhelming probability.
pub trait IdGenerator: Send + Sync {
    /// Generates a new unique identifier.
    fn generate(&self) -> UniqueId;
}

impl<G: IdGenerator + ?Sized> IdGenerator for Arc<G> {
    fn generate(&self) -> UniqueId {
        (**self).generate()
    }
}

impl<G: IdGenerator + ?Sized> IdGenerator for Box<G> {
    fn generate(&self) -> UniqueId {
        (**self).generate()
    }
}

/// Random 128-bit identifiers encoded as unpadded URL-safe base64.
///
/// Produces 22-character tokens such as `Qx2c7bDnSdO0zAPqzV3k1g`, safe for use
/// in file names and URLs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl RandomIdGenerator {
    /// Length in characters of every generated token.
    pub const TOKEN_LENGTH: usize = 22;

    /// Creates a new random generator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl IdGenerator for RandomIdGenerator {
    fn generate(&self) -> UniqueId {
        let uuid = Uuid::new_v4();
        UniqueId::from_generated(URL_SAFE_NO_PAD.encode(uuid.as_bytes()))
    }
}

/// Time-sortable identifiers backed by ULIDs.
///
/// Tokens are 26 characters of Crockford base32 and sort by creation time
/// at millisecond granularity.
#[derive(Debug, Clone, Copy, Default)]
pub struct UlidIdGenerator;

impl UlidIdGenerator {
    /// Length in characters of every generated token.
    pub const TOKEN_LENGTH: usize = 26;

    /// Creates a new ULID generator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl IdGenerator for UlidIdGenerator {
    fn generate(&self) -> UniqueId {
        UniqueId::from_generated(Ulid::new().to_string())
    }
}
