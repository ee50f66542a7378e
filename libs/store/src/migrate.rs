//! Carrying identifiers over from older storage schemes.
//!
//! Objects that were assigned an identifier before this store existed keep
//! it: the old value is seeded into the object's directory instead of a new
//! one being generated.

use tracing::debug;
use uniqueid_id::UniqueId;

use crate::error::SourceError;
use crate::location::StorageLocation;
use crate::store::{IdStore, SeedOutcome};
use crate::StoreError;

/// Where an object's previously assigned identifier can be found.
pub trait LegacyIdSource {
    /// The identifier the old scheme holds for this object, if any.
    fn legacy_id(&self) -> Result<Option<UniqueId>, SourceError>;
}

impl<F> LegacyIdSource for F
where
    F: Fn() -> Result<Option<UniqueId>, SourceError>,
{
    fn legacy_id(&self) -> Result<Option<UniqueId>, SourceError> {
        self()
    }
}

/// Result of a successful [`IdStore::migrate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// The legacy identifier is now stored in the location.
    Migrated(UniqueId),
    /// The location already had an identifier; the legacy one was ignored.
    AlreadyPresent,
    /// The legacy scheme had no identifier for this object.
    NothingToMigrate,
}

impl IdStore {
    /// Move the identifier held by `source` into `location`.
    ///
    /// Never overwrites an identifier the location already has. Failures of
    /// either the source or the write are returned to the caller.
    pub fn migrate<L, S>(&self, location: &L, source: &S) -> Result<MigrationOutcome, StoreError>
    where
        L: StorageLocation + ?Sized,
        S: LegacyIdSource + ?Sized,
    {
        let Some(id) = source.legacy_id().map_err(StoreError::LegacySource)? else {
            debug!(location = %location.root_dir().display(), "no legacy unique id to migrate");
            return Ok(MigrationOutcome::NothingToMigrate);
        };

        match self.seed_id(location, &id)? {
            SeedOutcome::Seeded => Ok(MigrationOutcome::Migrated(id)),
            SeedOutcome::AlreadyPresent => Ok(MigrationOutcome::AlreadyPresent),
        }
    }
}
