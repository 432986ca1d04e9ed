//! Key-value persistence backends
//!
//! Stores persist JSON text under string keys. The backend is injected so the
//! store never reaches for a global (`localStorage`, a REST endpoint, ...)
//! itself.

use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use indexmap::IndexMap;

use crate::StorageError;

/// Synchronous, single-writer key-value storage.
pub trait Storage {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Build the backend key for `key` under `namespace` (`"{namespace}_{key}"`).
pub fn namespaced_key(namespace: &str, key: &str) -> String {
    if namespace.is_empty() {
        key.to_string()
    } else {
        format!("{namespace}_{key}")
    }
}

/// In-memory storage.
///
/// Clones share the same underlying map, like handles onto a browser's
/// `localStorage`. An optional byte quota makes writes fail once the total
/// stored size would exceed it.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<IndexMap<String, String>>>,
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the total size of all stored values to `bytes`.
    pub fn with_quota(mut self, bytes: usize) -> Self {
        self.quota = Some(bytes);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.borrow().keys().cloned().collect()
    }

    /// Total bytes currently stored.
    pub fn used_bytes(&self) -> usize {
        self.entries.borrow().values().map(String::len).sum()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.borrow_mut();
        if let Some(limit) = self.quota {
            let current = entries.get(key).map(String::len).unwrap_or(0);
            let used: usize = entries.values().map(String::len).sum();
            let size = used - current + value.len();
            if size > limit {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    size,
                    limit,
                });
            }
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().shift_remove(key);
        Ok(())
    }
}

/// Directory-backed storage: one `<key>.json` file per key.
#[derive(Clone, Debug)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File path used for `key`. Characters outside `[A-Za-z0-9._-]` are
    /// replaced so a key can never escape the root directory.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let file: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        let file = file.trim_start_matches('.');
        self.root.join(format!("{file}.json"))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let io_err = |source| StorageError::Io {
            key: key.to_string(),
            source,
        };
        fs::create_dir_all(&self.root).map_err(io_err)?;

        // Write-then-rename so a failed write never truncates the old value.
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(io_err)?;
        fs::rename(&tmp, &path).map_err(io_err)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_clones_share_entries() {
        let mut a = MemoryStorage::new();
        let b = a.clone();
        a.set("k", "v").unwrap();
        assert_eq!(b.get("k").unwrap().as_deref(), Some("v"));
        a.remove("k").unwrap();
        assert!(b.is_empty());
    }

    #[test]
    fn memory_quota_rejects_oversized_writes() {
        let mut storage = MemoryStorage::new().with_quota(8);
        storage.set("a", "1234").unwrap();
        // Replacing an entry only counts the new size.
        storage.set("a", "12345678").unwrap();
        let err = storage.set("b", "x").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { size: 9, limit: 8, .. }));
        assert_eq!(storage.get("b").unwrap(), None);
    }

    #[test]
    fn namespaced_keys() {
        assert_eq!(namespaced_key("onestyle", "theme"), "onestyle_theme");
        assert_eq!(namespaced_key("", "theme"), "theme");
    }

    #[test]
    fn file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path().join("store"));

        assert_eq!(storage.get("theme").unwrap(), None);
        storage.set("theme", "{\"a\":1}").unwrap();
        assert_eq!(storage.get("theme").unwrap().as_deref(), Some("{\"a\":1}"));

        storage.remove("theme").unwrap();
        storage.remove("theme").unwrap();
        assert_eq!(storage.get("theme").unwrap(), None);
    }

    #[test]
    fn file_storage_keys_stay_inside_root() {
        let storage = FileStorage::new("/data");
        assert_eq!(storage.path_for("../etc/passwd"), PathBuf::from("/data/_etc_passwd.json"));
        assert_eq!(storage.path_for("one_theme"), PathBuf::from("/data/one_theme.json"));
    }
}
