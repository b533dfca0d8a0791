//! Persisted client state
//!
//! This module provides a small synchronous key/value store used to keep the
//! session record across process restarts. Reads must be synchronous so the
//! session can be rehydrated before the first navigation decision.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::{debug, info};

use crate::error::{ClientError, ClientResult};

/// A string key/value store
pub trait KeyValueStore: Send + Sync {
    /// Get a value by key
    fn get(&self, key: &str) -> ClientResult<Option<String>>;

    /// Set a key-value pair, replacing any previous value
    fn set(&self, key: &str, value: &str) -> ClientResult<()>;

    /// Delete a key; deleting a missing key is not an error
    fn delete(&self, key: &str) -> ClientResult<()>;
}

/// Store keeping one `<key>.json` file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed
    pub fn open(dir: impl Into<PathBuf>) -> ClientResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            ClientError::Storage(format!("Failed to create {}: {}", dir.display(), e))
        })?;
        info!("File store opened at {}", dir.display());
        Ok(Self { dir })
    }

    /// Directory backing this store
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> ClientResult<PathBuf> {
        if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(ClientError::Storage(format!("Invalid storage key: {:?}", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> ClientResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ClientError::Storage(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        let path = self.path_for(key)?;
        // Write to a sibling file first so a crash never leaves half a record behind.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)
            .and_then(|_| fs::rename(&tmp, &path))
            .map_err(|e| {
                ClientError::Storage(format!("Failed to write {}: {}", path.display(), e))
            })?;
        debug!("Stored key {}", key);
        Ok(())
    }

    fn delete(&self, key: &str) -> ClientResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("Deleted key {}", key);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ClientError::Storage(format!(
                "Failed to delete {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

/// In-process store, shared between clones
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    /// Whether the store holds no keys
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> ClientResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| ClientError::Storage("Memory store lock poisoned".to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> ClientResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> ClientResult<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_set_get_delete() -> ClientResult<()> {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::open(dir.path().join("state"))?;

        assert_eq!(store.get("user")?, None);

        store.set("user", r#"{"email":"a@b.co"}"#)?;
        assert_eq!(store.get("user")?, Some(r#"{"email":"a@b.co"}"#.to_string()));

        // A second store over the same directory sees the same data
        let reopened = FileStore::open(store.dir())?;
        assert!(reopened.get("user")?.is_some());

        store.delete("user")?;
        assert_eq!(store.get("user")?, None);

        // Deleting again is fine
        store.delete("user")?;
        Ok(())
    }

    #[test]
    fn test_file_store_rejects_path_like_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::open(dir.path()).unwrap();

        assert!(matches!(
            store.set("../escape", "x"),
            Err(ClientError::Storage(_))
        ));
    }

    #[test]
    fn test_memory_store_clones_share_entries() -> ClientResult<()> {
        let store = MemoryStore::new();
        let clone = store.clone();

        clone.set("user", "value")?;
        assert_eq!(store.get("user")?, Some("value".to_string()));
        assert_eq!(store.len(), 1);

        store.delete("user")?;
        assert!(clone.is_empty());
        Ok(())
    }
}
