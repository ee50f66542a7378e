//! # uniqueid-store
//!
//! Persists one unique identifier per object storage directory.
//!
//! ## Operations
//!
//! - [`IdStore::ensure_id`]: create an identifier if the object has none (best effort)
//! - [`IdStore::get_id`]: read the identifier, `None` if absent or unreadable
//! - [`IdStore::seed_id`]: install an identifier computed elsewhere, never overwriting
//! - [`IdStore::migrate`]: seed from a [`LegacyIdSource`]
//!
//! ## Filesystem requirements
//!
//! Correctness rests on the filesystem providing a rename that fails when the
//! target exists (`renameat2` with `RENAME_NOREPLACE`, or `link` + `unlink`).
//! Local POSIX filesystems do; some network filesystems do not, and on those
//! two racing writers may both believe they won. Only writers sharing one
//! filesystem are coordinated; there is no cross-machine locking.
//!
//! ## Logging
//!
//! Events are emitted through `tracing`. The store installs no subscriber;
//! whatever the host has set as the current dispatcher receives them.

mod config;
mod error;
mod location;
mod migrate;
mod store;

pub use crate::config::{StoreConfig, DEFAULT_FILE_NAME, DEFAULT_TEMP_PREFIX, DEFAULT_TEMP_SUFFIX};
pub use error::{SourceError, StoreError};
pub use location::StorageLocation;
pub use migrate::{LegacyIdSource, MigrationOutcome};
pub use store::{IdStore, SeedOutcome};

/// Re-export the identifier crate for consumers that only depend on the store.
pub use uniqueid_id::{IdError, IdGenerator, RandomIdGenerator, UlidIdGenerator, UniqueId};
