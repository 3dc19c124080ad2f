//! Key-value persistence — the injected replacement for browser local storage.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use thiserror::Error;
use tracing::info;

/// Stored display name
pub const KEY_USER_NAME: &str = "userName";
/// "true" / "false"
pub const KEY_DARK_THEME: &str = "isDarkTheme";
/// Inline image data URI
pub const KEY_AVATAR: &str = "userAvatar";
/// JSON array of `{city, time}`
pub const KEY_WEATHER_HISTORY: &str = "weatherHistory";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("storage file is not a JSON object: {0}")]
    Json(#[from] serde_json::Error),
}

/// String-to-string persistent storage, shared between the UI loop and
/// spawned tasks.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
    fn clear(&self) -> Result<(), StorageError>;
}

fn lock(map: &Mutex<BTreeMap<String, String>>) -> MutexGuard<'_, BTreeMap<String, String>> {
    // The map is only ever replaced whole, so a poisoned one is still consistent.
    map.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// In-memory store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        lock(&self.entries).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        lock(&self.entries).remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        lock(&self.entries).clear();
        Ok(())
    }
}

/// Store backed by a single JSON object file. Every mutation rewrites it.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open (or lazily create) the store at `path`.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let entries = if path.is_file() {
            let content = std::fs::read_to_string(path).map_err(|source| StorageError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            BTreeMap::new()
        };
        info!("Opened storage {} ({} keys)", path.display(), entries.len());
        Ok(Self {
            path: path.to_path_buf(),
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let io_err = |source: std::io::Error| StorageError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let content = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, content).map_err(io_err)
    }

    /// Apply `change` to a copy, write it out, and keep it only if the write
    /// went through.
    fn update(
        &self,
        change: impl FnOnce(&mut BTreeMap<String, String>),
    ) -> Result<(), StorageError> {
        let mut entries = lock(&self.entries);
        let mut next = entries.clone();
        change(&mut next);
        self.flush(&next)?;
        *entries = next;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.update(|entries| {
            entries.remove(key);
        })
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.update(|entries| entries.clear())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_basic() {
        let store = MemoryStore::new();
        assert_eq!(store.get(KEY_USER_NAME), None);
        store.set(KEY_USER_NAME, "Masha").unwrap();
        assert_eq!(store.get(KEY_USER_NAME).as_deref(), Some("Masha"));
        store.remove(KEY_USER_NAME).unwrap();
        assert_eq!(store.get(KEY_USER_NAME), None);
    }

    #[test]
    fn test_file_store_persists_across_opens() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("storage.json");

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.path(), path.as_path());
        assert!(!path.exists());
        store.set(KEY_USER_NAME, "Masha").unwrap();
        store.set(KEY_DARK_THEME, "true").unwrap();
        drop(store);

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get(KEY_USER_NAME).as_deref(), Some("Masha"));
        assert_eq!(reopened.get(KEY_DARK_THEME).as_deref(), Some("true"));
    }

    #[test]
    fn test_file_store_clear() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("storage.json");

        let store = FileStore::open(&path).unwrap();
        store.set(KEY_AVATAR, "data:image/png;base64,AAAA").unwrap();
        store.clear().unwrap();
        assert_eq!(store.get(KEY_AVATAR), None);

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get(KEY_AVATAR), None);
    }

    #[test]
    fn test_file_store_rejects_garbage() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("storage.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();

        assert!(matches!(FileStore::open(&path), Err(StorageError::Json(_))));
    }

    #[test]
    fn test_failed_write_leaves_store_unchanged() {
        let tmp = tempfile::tempdir().unwrap();
        // A regular file where the parent directory should be
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let path = blocker.join("storage.json");

        let store = FileStore::open(&path).unwrap();
        let err = store.set(KEY_USER_NAME, "Masha").unwrap_err();
        assert!(matches!(err, StorageError::Io { .. }));
        assert_eq!(store.get(KEY_USER_NAME), None);
    }

    #[test]
    fn test_failed_clear_keeps_entries() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("data").join("storage.json");

        let store = FileStore::open(&path).unwrap();
        store.set(KEY_USER_NAME, "Masha").unwrap();

        // Swap the data directory for a file so the next write fails
        std::fs::remove_dir_all(tmp.path().join("data")).unwrap();
        std::fs::write(tmp.path().join("data"), "").unwrap();

        assert!(store.clear().is_err());
        assert_eq!(store.get(KEY_USER_NAME).as_deref(), Some("Masha"));
    }
}
