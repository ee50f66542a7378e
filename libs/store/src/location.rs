//! Storage locations.

use std::path::{Path, PathBuf};

/// A directory owned by one persistent object, where its state lives.
///
/// Hosts implement this for their own object types; plain paths work too.
/// The directory must already exist for an identifier to be stored in it.
pub trait StorageLocation {
    /// The object's storage directory.
    fn root_dir(&self) -> &Path;
}

impl StorageLocation for Path {
    fn root_dir(&self) -> &Path {
        self
    }
}

impl StorageLocation for PathBuf {
    fn root_dir(&self) -> &Path {
        self.as_path()
    }
}

impl<T: StorageLocation + ?Sized> StorageLocation for &T {
    fn root_dir(&self) -> &Path {
        (**self).root_dir()
    }
}
