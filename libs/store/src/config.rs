//! Store configuration.
//!
//! Every field has a default, so an empty config file (or none at all) gives
//! the standard `unique-id.txt` layout.

use std::path::Path;

use serde::Deserialize;

use crate::StoreError;

/// Default name of the identifier file.
pub const DEFAULT_FILE_NAME: &str = "unique-id.txt";

/// Default prefix of temporary files.
pub const DEFAULT_TEMP_PREFIX: &str = ".unique-id_";

/// Default suffix of temporary files.
pub const DEFAULT_TEMP_SUFFIX: &str = ".tmp";

/// Configuration for an [`IdStore`](crate::IdStore).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Name of the identifier file inside each storage location.
    pub file_name: String,

    /// Prefix of the temporary file written before the rename.
    pub temp_prefix: String,

    /// Suffix of the temporary file written before the rename.
    pub temp_suffix: String,

    /// Whether to fsync the temporary file before moving it into place.
    pub sync_on_write: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_FILE_NAME.to_string(),
            temp_prefix: DEFAULT_TEMP_PREFIX.to_string(),
            temp_suffix: DEFAULT_TEMP_SUFFIX.to_string(),
            sync_on_write: true,
        }
    }
}

impl StoreConfig {
    /// Load configuration from a file.
    ///
    /// The format is picked from the extension (`.toml`, `.yaml`, `.json`, ...).
    /// Missing keys fall back to their defaults. The result is validated.
    pub fn from_file(path: &Path) -> Result<Self, StoreError> {
        let config: StoreConfig = config::Config::builder()
            .add_source(config::File::from(path))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration describes a usable layout.
    pub fn validate(&self) -> Result<(), StoreError> {
        let name = self.file_name.as_str();
        if name.is_empty() {
            return Err(StoreError::Config("file_name cannot be empty".to_string()));
        }
        if name == "." || name == ".." {
            return Err(StoreError::Config(format!(
                "file_name '{name}' is not a file name"
            )));
        }
        if has_separator(name) {
            return Err(StoreError::Config(format!(
                "file_name '{name}' must not contain a path separator"
            )));
        }
        // The temporary file must land next to the target.
        for (field, value) in [
            ("temp_prefix", &self.temp_prefix),
            ("temp_suffix", &self.temp_suffix),
        ] {
            if has_separator(value) || value == "." || value == ".." {
                return Err(StoreError::Config(format!(
                    "{field} '{value}' must stay inside the storage location"
                )));
            }
        }
        let has_pattern = !self.temp_prefix.is_empty() || !self.temp_suffix.is_empty();
        let matches_pattern =
            name.starts_with(&self.temp_prefix) && name.ends_with(&self.temp_suffix);
        if has_pattern && matches_pattern {
            // Would be indistinguishable from an abandoned temporary file.
            return Err(StoreError::Config(format!(
                "file_name '{name}' collides with the temporary file pattern"
            )));
        }
        Ok(())
    }
}

fn has_separator(s: &str) -> bool {
    s.contains('/') || s.contains(std::path::MAIN_SEPARATOR)
}
