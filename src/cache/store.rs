//! The key-value storage port behind [`crate::DatasetCache`], with an
//! in-memory and a file-backed adapter.

use crate::cache::error::CacheError;
use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;

/// A string key-value store. Each call is atomic for its single key.
///
/// Implementations take `&self`; shared mutable state lives behind whatever
/// synchronisation the adapter needs.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    fn set(&self, key: &str, value: &str) -> Result<(), CacheError>;

    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), CacheError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), CacheError> {
        (**self).remove(key)
    }
}

/// In-process store, optionally bounded by a byte quota over all stored values.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that refuses writes pushing the total value size past `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;
        if let Some(quota) = self.quota_bytes {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(_, v)| v.len())
                .sum();
            if others + value.len() > quota {
                return Err(CacheError::QuotaExceeded {
                    key: key.to_string(),
                    size: value.len(),
                    quota,
                });
            }
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

/// One file per key inside a directory. Writes go through a temp file in the
/// same directory and are renamed into place.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Uses `dir` as the store, creating it if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| CacheError::CacheDirCreation(dir.clone(), e))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, CacheError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(CacheError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CacheError::CacheRead(path, e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        let path = self.path_for(key)?;
        let mut temp_file =
            NamedTempFile::new_in(&self.dir).map_err(|e| CacheError::CacheWrite(path.clone(), e))?;
        temp_file
            .write_all(value.as_bytes())
            .map_err(|e| CacheError::CacheWrite(path.clone(), e))?;
        temp_file
            .flush()
            .map_err(|e| CacheError::CacheWrite(path.clone(), e))?;
        temp_file
            .persist(&path)
            .map_err(|e| CacheError::CacheWrite(path.clone(), e.error))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CacheError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::CacheDelete(path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(store: &dyn KeyValueStore) -> Result<(), CacheError> {
        assert_eq!(store.get("timeSeriesData")?, None);
        store.set("timeSeriesData", "[]")?;
        assert_eq!(store.get("timeSeriesData")?.as_deref(), Some("[]"));
        store.set("timeSeriesData", "[{}]")?;
        assert_eq!(store.get("timeSeriesData")?.as_deref(), Some("[{}]"));
        store.remove("timeSeriesData")?;
        store.remove("timeSeriesData")?;
        assert_eq!(store.get("timeSeriesData")?, None);
        Ok(())
    }

    #[test]
    fn test_memory_store() -> Result<(), CacheError> {
        exercise(&MemoryStore::new())
    }

    #[test]
    fn test_file_store() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let store = FileStore::new(dir.path().join("nested"))?;
        exercise(&store)?;
        Ok(())
    }

    #[test]
    fn test_memory_quota() -> Result<(), CacheError> {
        let store = MemoryStore::with_quota(10);
        store.set("a", "12345")?;
        // Replacing a key only counts the new value.
        store.set("a", "1234567890")?;
        let err = store.set("b", "x").unwrap_err();
        assert!(matches!(err, CacheError::QuotaExceeded { size: 1, quota: 10, .. }));
        Ok(())
    }

    #[test]
    fn test_file_store_rejects_path_like_keys() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let store = FileStore::new(dir.path())?;
        for key in ["", "../escape", "a/b", ".hidden"] {
            assert!(matches!(store.set(key, "x"), Err(CacheError::InvalidKey(_))));
        }
        Ok(())
    }
}
