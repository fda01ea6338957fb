//! Key-value backends for durable session storage
//!
//! The session collection is stored under a single key, so the backends
//! only need string get/set/remove. [`SledStorage`] keeps the data in an
//! embedded `sled` database in the user's data directory; [`MemoryStorage`]
//! keeps it in a shared map and is used by tests.

use crate::error::{NovaError, Result};
use directories::ProjectDirs;
use sled::Db;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// A string key-value store local to the client
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`
    ///
    /// # Errors
    ///
    /// Returns `NovaError::Storage` if the backend cannot be read or the
    /// stored bytes are not UTF-8
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    ///
    /// # Errors
    ///
    /// Returns `NovaError::Storage` if the write fails
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; removing a missing key is not an error
    ///
    /// # Errors
    ///
    /// Returns `NovaError::Storage` if the write fails
    fn remove(&self, key: &str) -> Result<()>;
}

/// Durable storage backed by an embedded `sled` database
///
/// Clones share the same open database.
#[derive(Clone)]
pub struct SledStorage {
    db: Db,
    path: PathBuf,
}

impl SledStorage {
    /// Open or create the database at the given directory
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the database directory
    ///
    /// # Errors
    ///
    /// Returns `NovaError::Storage` if the database cannot be opened
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use nova_scribe::storage::SledStorage;
    ///
    /// # fn main() -> nova_scribe::error::Result<()> {
    /// let storage = SledStorage::open("/tmp/nova-scribe/sessions.db")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                NovaError::Storage(format!("Failed to create storage directory: {}", e))
            })?;
        }

        let db = sled::open(&path)
            .map_err(|e| NovaError::Storage(format!("Failed to open database: {}", e)))?;

        tracing::debug!("Opened session storage at {}", path.display());

        Ok(Self { db, path })
    }

    /// Open the database in the user's data directory
    ///
    /// # Errors
    ///
    /// Returns `NovaError::Storage` if the data directory cannot be
    /// determined or the database cannot be opened
    pub fn open_default() -> Result<Self> {
        Self::open(default_storage_path()?)
    }

    /// Directory the database lives in
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for SledStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .db
            .get(key.as_bytes())
            .map_err(|e| NovaError::Storage(format!("Get failed: {}", e)))?;

        match value {
            Some(bytes) => {
                let text = String::from_utf8(bytes.to_vec())
                    .map_err(|e| NovaError::Storage(format!("Stored value is not UTF-8: {}", e)))?;
                Ok(Some(text))
            }
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.db
            .insert(key.as_bytes(), value.as_bytes())
            .map_err(|e| NovaError::Storage(format!("Insert failed: {}", e)))?;

        self.db
            .flush()
            .map_err(|e| NovaError::Storage(format!("Flush failed: {}", e)))?;

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.db
            .remove(key.as_bytes())
            .map_err(|e| NovaError::Storage(format!("Remove failed: {}", e)))?;

        self.db
            .flush()
            .map_err(|e| NovaError::Storage(format!("Flush failed: {}", e)))?;

        Ok(())
    }
}

/// Default location of the session database
///
/// # Errors
///
/// Returns `NovaError::Storage` if the platform data directory is unknown
pub fn default_storage_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("com", "novascribe", "nova-scribe")
        .ok_or_else(|| NovaError::Storage("Could not determine data directory".into()))?;

    Ok(proj_dirs.data_dir().join("sessions.db"))
}

/// In-memory storage
///
/// Clones share the same map, so a test can keep one handle and "reload"
/// a store from another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding a single entry
    pub fn with_entry(key: &str, value: &str) -> Self {
        let storage = Self::new();
        if let Ok(mut entries) = storage.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
        storage
    }

    fn entries(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| NovaError::Storage("Memory storage lock poisoned".to_string()).into())
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sled_set_get_remove() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let storage = SledStorage::open(temp_dir.path().join("kv.db")).unwrap();

        assert_eq!(storage.get("allChatSessions").unwrap(), None);

        storage.set("allChatSessions", "[]").unwrap();
        assert_eq!(storage.get("allChatSessions").unwrap().as_deref(), Some("[]"));

        storage.remove("allChatSessions").unwrap();
        assert_eq!(storage.get("allChatSessions").unwrap(), None);
    }

    #[test]
    fn test_sled_remove_missing_key_is_ok() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let storage = SledStorage::open(temp_dir.path().join("kv.db")).unwrap();
        assert!(storage.remove("chatMessages").is_ok());
    }

    #[test]
    fn test_sled_clones_share_database() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("kv.db");
        let storage = SledStorage::open(&path).unwrap();
        let other = storage.clone();
        storage.set("k", "v").unwrap();
        assert_eq!(other.get("k").unwrap().as_deref(), Some("v"));
        assert_eq!(other.path(), path.as_path());
    }

    #[test]
    fn test_sled_creates_missing_parent_directories() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("nested").join("dir").join("kv.db");
        let storage = SledStorage::open(&path).unwrap();
        storage.set("k", "v").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_memory_clones_share_entries() {
        let storage = MemoryStorage::new();
        let other = storage.clone();
        storage.set("k", "v").unwrap();
        assert_eq!(other.get("k").unwrap().as_deref(), Some("v"));
        other.remove("k").unwrap();
        assert_eq!(storage.get("k").unwrap(), None);
    }
}
