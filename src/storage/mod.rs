//! Durable key/value storage
//!
//! Filter criteria survive restarts by being written as strings under
//! per-context keys. The [`DurableStorage`] trait is the seam the filter
//! managers depend on; two implementations are provided:
//!
//! - [`SledStorage`]: backed by a sled tree on disk
//! - [`MemoryStorage`]: a process-local map, used when no store can be opened
//!   and in tests
//!
//! Writes are last-writer-wins. Nothing here locks across keys.

use sled::{Db, Tree};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

pub mod error;

pub use error::StorageError;

/// Name of the sled tree holding the string entries
const TREE_NAME: &str = "local_storage";

/// Minimal string key/value store
pub trait DurableStorage: Send + Sync {
    /// Read the value stored under `key`
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the entry under `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Sled-backed durable storage
///
/// Every write is flushed before returning so short-lived processes (the CLI)
/// never lose an update.
pub struct SledStorage {
    db: Db,
    entries: Tree,
}

impl SledStorage {
    /// Opens or creates a store at the specified directory
    ///
    /// # Examples
    /// ```no_run
    /// use lora_browse::storage::{DurableStorage, SledStorage};
    /// let storage = SledStorage::open("my_store").unwrap();
    /// storage.set("key", "value").unwrap();
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the database or its tree cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let db = sled::open(path)?;
        let entries = db.open_tree(TREE_NAME)?;
        Ok(Self { db, entries })
    }
}

impl DurableStorage for SledStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self.entries.get(key.as_bytes())? {
            Some(value) => String::from_utf8(value.to_vec())
                .map(Some)
                .map_err(|_| StorageError::InvalidUtf8(key.to_string())),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.as_bytes(), value.as_bytes())?;
        self.db.flush()?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key.as_bytes())?;
        self.db.flush()?;
        Ok(())
    }
}

/// In-memory storage that lives as long as the value does
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with a single entry
    #[must_use]
    pub fn with_entry(key: &str, value: &str) -> Self {
        let storage = Self::new();
        storage
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        storage
    }
}

impl DurableStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

/// Get the default on-disk storage location
///
/// Returns `<data_dir>/lora-browse/storage` (platform-specific)
///
/// # Errors
///
/// Returns `StorageError` if the data directory cannot be determined
pub fn default_storage_path() -> Result<PathBuf, StorageError> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| StorageError::PathError("Could not determine data directory".to_string()))?;

    Ok(data_dir.join("lora-browse").join("storage"))
}
