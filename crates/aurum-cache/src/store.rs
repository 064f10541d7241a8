//! Raw key-value backends.
//!
//! Values are JSON text. [`MemoryStore`] lives as long as the process, the
//! way session storage lives as long as a browser tab; [`FileStore`] keeps a
//! single JSON document on disk and survives restarts like local storage.

use crate::CacheError;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A string key-value store.
pub trait KeyValueStore: Send + Sync {
    fn get_raw(&self, key: &str) -> Result<Option<String>, CacheError>;

    fn set_raw(&self, key: &str, value: String) -> Result<(), CacheError>;

    /// Returns whether the key existed.
    fn delete(&self, key: &str) -> Result<bool, CacheError>;

    /// All keys, sorted.
    fn keys(&self) -> Result<Vec<String>, CacheError>;

    fn clear(&self) -> Result<(), CacheError>;
}

type Entries = BTreeMap<String, String>;

fn read_lock(entries: &RwLock<Entries>) -> Result<RwLockReadGuard<'_, Entries>, CacheError> {
    entries
        .read()
        .map_err(|_| CacheError::StoreError("lock poisoned".to_string()))
}

fn write_lock(entries: &RwLock<Entries>) -> Result<RwLockWriteGuard<'_, Entries>, CacheError> {
    entries
        .write()
        .map_err(|_| CacheError::StoreError("lock poisoned".to_string()))
}

/// In-process store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<Entries>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(read_lock(&self.entries)?.get(key).cloned())
    }

    fn set_raw(&self, key: &str, value: String) -> Result<(), CacheError> {
        write_lock(&self.entries)?.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool, CacheError> {
        Ok(write_lock(&self.entries)?.remove(key).is_some())
    }

    fn keys(&self) -> Result<Vec<String>, CacheError> {
        Ok(read_lock(&self.entries)?.keys().cloned().collect())
    }

    fn clear(&self) -> Result<(), CacheError> {
        write_lock(&self.entries)?.clear();
        Ok(())
    }
}

/// Store persisted as one JSON object in a file.
///
/// The whole document is rewritten on every mutation through a temporary
/// file and a rename, so a crash never leaves a half-written document.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<Entries>,
}

impl FileStore {
    /// Open (or create on first write) the store at `path`.
    ///
    /// An unreadable document is logged and replaced by an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => Entries::new(),
            Ok(text) => match serde_json::from_str::<Entries>(&text) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "discarding corrupt store");
                    Entries::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => Entries::new(),
            Err(source) => return Err(CacheError::OpenError { path, source }),
        };

        tracing::debug!(path = %path.display(), keys = entries.len(), "opened file store");
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &Entries) -> Result<(), CacheError> {
        let write_err = |source| CacheError::WriteError {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let text = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, text).map_err(write_err)?;
        fs::rename(&tmp, &self.path).map_err(write_err)
    }
}

impl KeyValueStore for FileStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(read_lock(&self.entries)?.get(key).cloned())
    }

    fn set_raw(&self, key: &str, value: String) -> Result<(), CacheError> {
        let mut entries = write_lock(&self.entries)?;
        entries.insert(key.to_string(), value);
        self.persist(&entries)
    }

    fn delete(&self, key: &str) -> Result<bool, CacheError> {
        let mut entries = write_lock(&self.entries)?;
        let existed = entries.remove(key).is_some();
        if existed {
            self.persist(&entries)?;
        }
        Ok(existed)
    }

    fn keys(&self) -> Result<Vec<String>, CacheError> {
        Ok(read_lock(&self.entries)?.keys().cloned().collect())
    }

    fn clear(&self) -> Result<(), CacheError> {
        let mut entries = write_lock(&self.entries)?;
        entries.clear();
        self.persist(&entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_basics() {
        let store = MemoryStore::new();
        assert_eq!(store.get_raw("a").unwrap(), None);

        store.set_raw("b", "2".to_string()).unwrap();
        store.set_raw("a", "1".to_string()).unwrap();
        assert_eq!(store.get_raw("a").unwrap().as_deref(), Some("1"));
        assert_eq!(store.keys().unwrap(), vec!["a", "b"]);

        assert!(store.delete("a").unwrap());
        assert!(!store.delete("a").unwrap());

        store.clear().unwrap();
        assert!(store.keys().unwrap().is_empty());
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("local.json");

        let store = FileStore::open(&path).unwrap();
        store.set_raw("cart:guest", r#"{"items":[]}"#.to_string()).unwrap();
        drop(store);

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(
            reopened.get_raw("cart:guest").unwrap().as_deref(),
            Some(r#"{"items":[]}"#)
        );
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("nothing.json")).unwrap();
        assert!(store.keys().unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_file_store_discards_corrupt_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local.json");
        fs::write(&path, "{not json").unwrap();

        let store = FileStore::open(&path).unwrap();
        assert!(store.keys().unwrap().is_empty());
        store.set_raw("k", "1".to_string()).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("\"k\""));
    }

    #[test]
    fn test_file_store_delete_and_clear_persist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local.json");
        let store = FileStore::open(&path).unwrap();
        store.set_raw("a", "1".to_string()).unwrap();
        store.set_raw("b", "2".to_string()).unwrap();
        store.delete("a").unwrap();

        assert_eq!(FileStore::open(&path).unwrap().keys().unwrap(), vec!["b"]);

        store.clear().unwrap();
        assert!(FileStore::open(&path).unwrap().keys().unwrap().is_empty());
    }
}
