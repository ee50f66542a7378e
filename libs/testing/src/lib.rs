//! Test fixtures shared across the uniqueid crates.
//!
//! - [`SequenceGenerator`]: deterministic `IdGenerator` that records every token it hands out
//! - [`TempLocation`]: a throwaway storage directory

use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use tempfile::TempDir;
use uniqueid_id::{IdGenerator, UniqueId};

/// Generator that hands out a scripted sequence of tokens.
///
/// Once the script runs out it falls back to `gen-<n>` so concurrent tests
/// still get distinct tokens.
#[derive(Debug, Default)]
pub struct SequenceGenerator {
    script: Mutex<VecDeque<UniqueId>>,
    issued: Mutex<Vec<UniqueId>>,
    counter: AtomicUsize,
}

impl SequenceGenerator {
    /// Creates a generator that yields `tokens` in order.
    ///
    /// # Panics
    ///
    /// Panics if any token is not a valid identifier.
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let script = tokens
            .into_iter()
            .map(|t| UniqueId::parse(t.as_ref()).expect("scripted token must be valid"))
            .collect();
        Self {
            script: Mutex::new(script),
            ..Self::default()
        }
    }

    /// Creates a generator that only produces `gen-<n>` tokens.
    pub fn counting() -> Self {
        Self::default()
    }

    /// Every token handed out so far, in issue order.
    pub fn issued(&self) -> Vec<UniqueId> {
        self.issued.lock().unwrap().clone()
    }

    /// Number of times `generate` has been called.
    pub fn calls(&self) -> usize {
        self.issued.lock().unwrap().len()
    }
}

impl IdGenerator for SequenceGenerator {
    fn generate(&self) -> UniqueId {
        let next = self.script.lock().unwrap().pop_front();
        let id = next.unwrap_or_else(|| {
            let n = self.counter.fetch_add(1, Ordering::SeqCst);
            UniqueId::parse(&format!("gen-{n}")).unwrap()
        });
        self.issued.lock().unwrap().push(id.clone());
        id
    }
}

/// A storage directory that is removed when dropped.
pub struct TempLocation {
    dir: TempDir,
}

impl TempLocation {
    /// Creates a fresh, empty directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    /// Path of the directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of `name` inside the directory.
    pub fn join(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Sorted names of every entry in the directory.
    pub fn entries(&self) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(self.dir.path())? {
            let entry = entry?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }
}

impl Default for TempLocation {
    fn default() -> Self {
        Self::new()
    }
}
