//! Error types for identifier persistence.

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use uniqueid_id::IdError;

/// Boxed error returned by legacy identifier sources.
pub type SourceError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while storing or reading an identifier.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The temporary file could not be created next to the target.
    #[error("failed to create temporary file in {dir}: {source}")]
    CreateTemp {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing or syncing the temporary file failed.
    #[error("failed to write identifier to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The no-clobber rename onto the target failed for a reason other
    /// than the target already existing.
    #[error("failed to move identifier into place at {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The identifier file exists but could not be read.
    #[error("failed to read identifier from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The identifier file holds something that is not a valid identifier.
    #[error("invalid identifier in {path}: {source}")]
    InvalidContent {
        path: PathBuf,
        #[source]
        source: IdError,
    },

    /// The store configuration is unusable.
    #[error("invalid store configuration: {0}")]
    Config(String),

    /// The configuration file could not be loaded.
    #[error("failed to load store configuration: {0}")]
    ConfigLoad(#[from] config::ConfigError),

    /// A legacy identifier source failed.
    #[error("legacy identifier source failed: {0}")]
    LegacySource(#[source] SourceError),
}

impl StoreError {
    /// Returns the underlying I/O error, if this failure came from the filesystem.
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            StoreError::CreateTemp { source, .. }
            | StoreError::Write { source, .. }
            | StoreError::Persist { source, .. }
            | StoreError::Read { source, .. } => Some(source),
            _ => None,
        }
    }
}
