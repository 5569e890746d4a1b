//! Durable cart storage port.
//!
//! The store is written through an injectable port so tests can run against
//! an in-memory backend and the UI shell can plug in whatever durable local
//! storage it has. The port moves raw snapshots; parsing, validation, and
//! corruption recovery stay in [`crate::cart::CartStore`].

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing store failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Read/write port for the persisted cart snapshot.
pub trait CartStorage {
    /// Load the last persisted snapshot, `None` if nothing was ever saved.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot be read.
    fn load(&self) -> Result<Option<String>, StorageError>;

    /// Persist a full snapshot, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot be written.
    fn save(&self, snapshot: &str) -> Result<(), StorageError>;
}

/// In-memory storage for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    snapshot: Mutex<Option<String>>,
}

impl MemoryStorage {
    /// Create empty in-memory storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage pre-seeded with a snapshot, as if a previous session
    /// had saved it.
    #[must_use]
    pub fn seeded(snapshot: &str) -> Self {
        Self {
            snapshot: Mutex::new(Some(snapshot.to_string())),
        }
    }

    /// The currently held snapshot, if any.
    #[must_use]
    pub fn snapshot(&self) -> Option<String> {
        self.snapshot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl CartStorage for MemoryStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.snapshot())
    }

    fn save(&self, snapshot: &str) -> Result<(), StorageError> {
        *self
            .snapshot
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(snapshot.to_string());
        Ok(())
    }
}

/// File-backed storage: one JSON document at a fixed path.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Create storage backed by the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CartStorage for FileStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, snapshot: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, snapshot)?;
        Ok(())
    }
}
