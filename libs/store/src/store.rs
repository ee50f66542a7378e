//! The identifier store.
//!
//! # Storage Layout
//!
//! ```text
//! <object root dir>/
//! ├── ...                       # the object's own state, untouched
//! ├── unique-id.txt             # the identifier, nothing else
//! └── .unique-id_XXXXXX.tmp     # transient, only while a write is in flight
//! ```
//!
//! # Write protocol
//!
//! The identifier is written to a temporary file in the same directory and
//! then moved onto `unique-id.txt` with a rename that fails if the target
//! already exists. Whoever renames first wins; everyone else deletes their
//! temporary file and keeps the winner's identifier. Readers only ever see
//! no file or a complete one.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};
use uniqueid_id::{IdGenerator, RandomIdGenerator, UniqueId};

use crate::config::StoreConfig;
use crate::location::StorageLocation;
use crate::StoreError;

/// Result of a successful [`IdStore::seed_id`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The given identifier is now the location's identifier.
    Seeded,
    /// The location already had an identifier, which was left alone.
    AlreadyPresent,
}

/// Result of a create-if-absent attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum EnsureOutcome {
    Created(UniqueId),
    AlreadyPresent,
}

/// Result of reading the identifier file.
#[derive(Debug)]
enum Lookup {
    Found(UniqueId),
    Absent,
    Failed(StoreError),
}

/// Result of moving a temporary file onto the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Install {
    Installed,
    /// The target appeared first; the temporary file was discarded.
    Lost,
}

/// Assigns and persists one unique identifier per storage location.
///
/// The store holds no per-location state, so a single instance can be shared
/// across threads and used for any number of locations.
#[derive(Clone)]
pub struct IdStore {
    config: StoreConfig,
    generator: Arc<dyn IdGenerator>,
}

impl std::fmt::Debug for IdStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdStore")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for IdStore {
    fn default() -> Self {
        Self::new(RandomIdGenerator::new())
    }
}

impl IdStore {
    /// Create a store with the default layout.
    pub fn new<G: IdGenerator + 'static>(generator: G) -> Self {
        Self {
            config: StoreConfig::default(),
            generator: Arc::new(generator),
        }
    }

    /// Create a store with a custom layout.
    ///
    /// Fails if the configuration does not validate.
    pub fn with_config<G: IdGenerator + 'static>(
        config: StoreConfig,
        generator: G,
    ) -> Result<Self, StoreError> {
        config.validate()?;
        Ok(Self {
            config,
            generator: Arc::new(generator),
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Path of the identifier file for `location`.
    pub fn id_path<L: StorageLocation + ?Sized>(&self, location: &L) -> PathBuf {
        location.root_dir().join(&self.config.file_name)
    }

    /// Make sure `location` has an identifier, creating one if it has none.
    ///
    /// Best effort: failures are logged and swallowed, and the next call
    /// simply tries again. Use [`get_id`](Self::get_id) to see the result.
    pub fn ensure_id<L: StorageLocation + ?Sized>(&self, location: &L) {
        let dir = location.root_dir();
        match self.try_ensure_id(location) {
            Ok(EnsureOutcome::Created(id)) => {
                info!(location = %dir.display(), id = %id, "stored unique id");
            }
            Ok(EnsureOutcome::AlreadyPresent) => {}
            Err(e) => {
                warn!(location = %dir.display(), error = %e, "failed to store unique id");
            }
        }
    }

    pub(crate) fn try_ensure_id<L: StorageLocation + ?Sized>(
        &self,
        location: &L,
    ) -> Result<EnsureOutcome, StoreError> {
        let dir = location.root_dir();
        let target = self.id_path(location);

        if target.exists() {
            debug!(location = %dir.display(), "unique id already present");
            return Ok(EnsureOutcome::AlreadyPresent);
        }

        let id = self.generator.generate();
        match self.install(dir, &target, &id)? {
            Install::Installed => Ok(EnsureOutcome::Created(id)),
            Install::Lost => {
                debug!(location = %dir.display(), "unique id created concurrently, keeping it");
                Ok(EnsureOutcome::AlreadyPresent)
            }
        }
    }

    /// Read the identifier of `location`.
    ///
    /// Returns `None` if there is none yet. Read failures are logged and also
    /// reported as `None`.
    pub fn get_id<L: StorageLocation + ?Sized>(&self, location: &L) -> Option<UniqueId> {
        match self.lookup(location) {
            Lookup::Found(id) => Some(id),
            Lookup::Absent => None,
            Lookup::Failed(e) => {
                warn!(
                    location = %location.root_dir().display(),
                    error = %e,
                    "failed to retrieve unique id"
                );
                None
            }
        }
    }

    /// Read the identifier of `location`, reporting read failures.
    pub fn try_get_id<L: StorageLocation + ?Sized>(
        &self,
        location: &L,
    ) -> Result<Option<UniqueId>, StoreError> {
        match self.lookup(location) {
            Lookup::Found(id) => Ok(Some(id)),
            Lookup::Absent => Ok(None),
            Lookup::Failed(e) => Err(e),
        }
    }

    fn lookup<L: StorageLocation + ?Sized>(&self, location: &L) -> Lookup {
        let path = self.id_path(location);

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no unique id file");
                return Lookup::Absent;
            }
            Err(source) => return Lookup::Failed(StoreError::Read { path, source }),
        };

        // Malformed sequences are replaced with U+FFFD.
        let content = match String::from_utf8(bytes) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %path.display(), "unique id file is not valid UTF-8");
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };

        match UniqueId::try_from_string(content) {
            Ok(id) => Lookup::Found(id),
            Err(source) => Lookup::Failed(StoreError::InvalidContent { path, source }),
        }
    }

    /// Install an identifier computed elsewhere, unless `location` already
    /// has one.
    ///
    /// Uses the same write protocol as [`ensure_id`](Self::ensure_id), so a
    /// concurrent `ensure_id` or `seed_id` can never be overwritten. Unlike
    /// `ensure_id`, failures are returned to the caller.
    pub fn seed_id<L: StorageLocation + ?Sized>(
        &self,
        location: &L,
        id: &UniqueId,
    ) -> Result<SeedOutcome, StoreError> {
        let dir = location.root_dir();
        let target = self.id_path(location);

        if target.exists() {
            debug!(
                location = %dir.display(),
                path = %target.display(),
                "not seeding unique id, one is already present"
            );
            return Ok(SeedOutcome::AlreadyPresent);
        }

        debug!(location = %dir.display(), path = %target.display(), "seeding unique id");
        match self.install(dir, &target, id)? {
            Install::Installed => {
                info!(location = %dir.display(), id = %id, "seeded unique id");
                Ok(SeedOutcome::Seeded)
            }
            Install::Lost => {
                debug!(location = %dir.display(), "unique id created concurrently, seed dropped");
                Ok(SeedOutcome::AlreadyPresent)
            }
        }
    }

    /// Write `id` to a temporary file in `dir` and move it onto `target`
    /// without replacing anything already there.
    fn install(&self, dir: &Path, target: &Path, id: &UniqueId) -> Result<Install, StoreError> {
        let mut builder = tempfile::Builder::new();
        builder
            .prefix(&self.config.temp_prefix)
            .suffix(&self.config.temp_suffix);
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(fs::Permissions::from_mode(0o644));
        }

        let mut tmp = builder
            .tempfile_in(dir)
            .map_err(|source| StoreError::CreateTemp {
                dir: dir.to_path_buf(),
                source,
            })?;
        let tmp_path = tmp.path().to_path_buf();

        tmp.write_all(id.as_str().as_bytes())
            .map_err(|source| StoreError::Write {
                path: tmp_path.clone(),
                source,
            })?;
        if self.config.sync_on_write {
            tmp.as_file()
                .sync_all()
                .map_err(|source| StoreError::Write {
                    path: tmp_path.clone(),
                    source,
                })?;
        }

        // Dropping the temporary file on either error path deletes it.
        match tmp.persist_noclobber(target) {
            Ok(_) => Ok(Install::Installed),
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => Ok(Install::Lost),
            Err(e) => Err(StoreError::Persist {
                path: target.to_path_buf(),
                source: e.error,
            }),
        }
    }
}
