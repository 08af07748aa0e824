//! Key-value store implementations.
//!
//! [`FileKeyValueStore`] keeps one JSON file per key under a base directory;
//! [`MemoryKeyValueStore`] is an in-process map for tests and ephemeral
//! sessions.

use crate::paths::ConfabPaths;
use confab_core::error::{ConfabError, Result};
use confab_core::storage::KeyValueStore;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// A key-value store backed by one file per key.
///
/// The directory structure is flat:
/// ```text
/// base_dir/
/// ├── conversations.json
/// └── <other-key>.json
/// ```
pub struct FileKeyValueStore {
    base_dir: PathBuf,
}

impl FileKeyValueStore {
    /// Creates a store rooted at `base_dir`, creating the directory if it
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    /// Creates a store at the default location (`~/.config/confab/history`).
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined or the
    /// directory cannot be created.
    pub fn default_location() -> Result<Self> {
        let base_dir = ConfabPaths::history_dir()
            .map_err(|e| ConfabError::storage(e.to_string()))?;
        Self::new(base_dir)
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.entry_path(key);

        if !path.exists() {
            return Ok(None);
        }

        let value = fs::read_to_string(&path)
            .map_err(|e| ConfabError::storage(format!("Failed to read {path:?}: {e}")))?;

        Ok(Some(value))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.entry_path(key);

        fs::write(&path, value)
            .map_err(|e| ConfabError::storage(format!("Failed to write {path:?}: {e}")))?;

        Ok(())
    }
}

/// An in-memory key-value store.
#[derive(Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_get_missing_key_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(temp_dir.path()).unwrap();
        assert_eq!(store.get("conversations").unwrap(), None);
    }

    #[test]
    fn test_set_then_get_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(temp_dir.path()).unwrap();

        store.set("conversations", "{\"a\": 1}").unwrap();
        assert_eq!(
            store.get("conversations").unwrap(),
            Some("{\"a\": 1}".to_string())
        );
    }

    #[test]
    fn test_set_overwrites_previous_value() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(temp_dir.path()).unwrap();

        store.set("conversations", "first").unwrap();
        store.set("conversations", "second").unwrap();
        assert_eq!(store.get("conversations").unwrap(), Some("second".to_string()));
    }

    #[test]
    fn test_new_creates_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("deep").join("history");
        let store = FileKeyValueStore::new(&nested).unwrap();

        store.set("conversations", "{}").unwrap();
        assert!(nested.join("conversations.json").exists());
    }

    #[test]
    fn test_memory_store_round_trips() {
        let store = MemoryKeyValueStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap(), Some("v".to_string()));
    }
}
