//! Key-value storage backends.
//!
//! A backend is the durable medium behind a [`StorageArea`](super::StorageArea):
//! a flat map of string keys to string values with atomic single-key reads
//! and writes. There are no multi-key transactions.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use thiserror::Error;
use tracing::debug;

/// Errors that can occur when accessing a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("storage I/O error for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },

    /// Key is not usable by this backend.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// A writer panicked while holding the lock.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// Abstraction for durable key-value storage.
///
/// Mirrors the browser `localStorage` contract: missing keys read as
/// `None`, and removing a missing key is not an error.
pub trait StorageBackend: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

// =============================================================================
// MemoryBackend
// =============================================================================

/// Process-local backend, used by tests and single-process embeddings.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryBackend {
    /// Create an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.read().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|_| StorageError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

// =============================================================================
// FileBackend
// =============================================================================

/// Directory-backed storage: one file per key.
///
/// Each write goes to its own uniquely named temporary sibling file that is
/// then renamed over the target, so a reader sees either the old value or
/// the new one, even with several processes writing the same key.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Open (and create if needed) a storage directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StorageError::Io {
            key: dir.display().to_string(),
            source,
        })?;
        debug!(dir = %dir.display(), "Opened file storage");
        Ok(Self { dir })
    }

    /// Directory holding the key files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidKey`] for keys that are empty, start
    /// with a dot or contain characters outside `[A-Za-z0-9_.-]`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));

        if !valid {
            return Err(StorageError::InvalidKey(key.to_owned()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl StorageBackend for FileBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_owned(),
                source,
            }),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let io_err = |source| StorageError::Io {
            key: key.to_owned(),
            source,
        };

        // Leading dot keeps temp files out of the valid key namespace
        let mut file = tempfile::Builder::new()
            .prefix(&format!(".{key}."))
            .suffix(".tmp")
            .tempfile_in(&self.dir)
            .map_err(io_err)?;
        file.write_all(value.as_bytes()).map_err(io_err)?;
        file.as_file().sync_all().map_err(io_err)?;
        file.persist(&path).map_err(|e| io_err(e.error))?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                key: key.to_owned(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(backend: &dyn StorageBackend) {
        assert_eq!(backend.get_item("cart").unwrap(), None);

        backend.set_item("cart", "[1]").unwrap();
        assert_eq!(backend.get_item("cart").unwrap().as_deref(), Some("[1]"));

        backend.set_item("cart", "[2]").unwrap();
        assert_eq!(backend.get_item("cart").unwrap().as_deref(), Some("[2]"));

        backend.remove_item("cart").unwrap();
        assert_eq!(backend.get_item("cart").unwrap(), None);

        // Removing again is fine
        backend.remove_item("cart").unwrap();
    }

    #[test]
    fn test_memory_backend_contract() {
        exercise(&MemoryBackend::new());
    }

    #[test]
    fn test_file_backend_contract() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(dir.path()).unwrap();
        exercise(&backend);
    }

    #[test]
    fn test_file_backend_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        FileBackend::open(dir.path())
            .unwrap()
            .set_item("cart", "[]")
            .unwrap();

        let reopened = FileBackend::open(dir.path()).unwrap();
        assert_eq!(reopened.get_item("cart").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_file_backend_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("profile").join("storage");
        let backend = FileBackend::open(&nested).unwrap();
        backend.set_item("cart", "[]").unwrap();
        assert!(nested.join("cart.json").exists());
    }

    #[test]
    fn test_file_backend_concurrent_writers() {
        let dir = tempfile::tempdir().unwrap();
        let long = format!("[{}]", vec!["1"; 4096].join(","));

        for _ in 0..50 {
            std::thread::scope(|s| {
                for value in [long.as_str(), "[2]"] {
                    let backend = FileBackend::open(dir.path()).unwrap();
                    s.spawn(move || {
                        for _ in 0..4 {
                            backend.set_item("cart", value).unwrap();
                        }
                    });
                }
            });

            let stored = FileBackend::open(dir.path())
                .unwrap()
                .get_item("cart")
                .unwrap()
                .unwrap();
            assert!(stored == long || stored == "[2]", "torn write: {} bytes", stored.len());
        }

        // No temp files are left behind
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .filter(|name| name != "cart.json")
            .collect();
        assert!(leftovers.is_empty(), "unexpected files: {leftovers:?}");
    }

    #[test]
    fn test_file_backend_rejects_bad_keys() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(dir.path()).unwrap();

        for key in ["", "../cart", ".hidden", "a/b", "cart key"] {
            assert!(
                matches!(backend.set_item(key, "x"), Err(StorageError::InvalidKey(_))),
                "key {key:?} should be rejected"
            );
        }
    }
}
