//! The identifier token type.
//!
//! A `UniqueId` is opaque: the store never interprets it beyond checking that
//! it is non-empty. Tokens written by older schemes can be arbitrarily long.

use crate::IdError;

/// An opaque, globally unique identifier token.
///
/// Tokens are immutable once minted. Equality is plain string equality.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UniqueId(String);

impl UniqueId {
    /// Parses an identifier from a string.
    ///
    /// The string is taken verbatim; no whitespace is trimmed.
    pub fn parse(s: &str) -> Result<Self, IdError> {
        Self::validate(s)?;
        Ok(Self(s.to_owned()))
    }

    /// Creates an identifier from an owned string without copying.
    pub fn try_from_string(s: String) -> Result<Self, IdError> {
        Self::validate(&s)?;
        Ok(Self(s))
    }

    /// Wraps a token minted by one of this crate's generators.
    pub(crate) fn from_generated(s: String) -> Self {
        debug_assert!(Self::validate(&s).is_ok());
        Self(s)
    }

    /// Returns the token as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the identifier, returning the underlying string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    fn validate(s: &str) -> Result<(), IdError> {
        if s.is_empty() {
            return Err(IdError::Empty);
        }
        Ok(())
    }
}

impl std::fmt::Display for UniqueId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for UniqueId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for UniqueId {
    type Error = IdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::try_from_string(s)
    }
}

impl From<UniqueId> for String {
    fn from(id: UniqueId) -> Self {
        id.0
    }
}

impl AsRef<str> for UniqueId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for UniqueId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for UniqueId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::try_from_string(s).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Tests
// =============================================================================
