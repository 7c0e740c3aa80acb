use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::KvStore;

/// File-backed key-value store: a single JSON object, rewritten on every set.
///
/// The write path goes through a sibling temp file and an atomic rename so a
/// crash mid-write leaves the previous snapshot intact. Suitable for the
/// small entry counts this cache holds; not a general-purpose database.
pub struct FileKv {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileKv {
    /// Open (or create) the store at `path`, loading any existing snapshot.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            serde_json::from_str(&raw).map_err(|source| StoreError::CorruptEntry {
                key: path.display().to_string(),
                source,
            })?
        } else {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            BTreeMap::new()
        };
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(entries).map_err(|source| {
            StoreError::CorruptEntry {
                key: self.path.display().to_string(),
                source,
            }
        })?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), entries = entries.len(), "cache persisted");
        Ok(())
    }
}

impl KvStore for FileKv {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let map = self.entries.lock().expect("lock poisoned");
        Ok(map.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut map = self.entries.lock().expect("lock poisoned");
        map.insert(key.to_string(), value.to_string());
        self.persist(&map)
    }

    fn remove(&self, key: &str) -> StoreResult<bool> {
        let mut map = self.entries.lock().expect("lock poisoned");
        let existed = map.remove(key).is_some();
        if existed {
            self.persist(&map)?;
        }
        Ok(existed)
    }
}

impl std::fmt::Debug for FileKv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileKv").field("path", &self.path).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");

        let kv = FileKv::open(&path).unwrap();
        kv.set("posts", "[]").unwrap();
        kv.set("prefs.theme", "mint").unwrap();
        drop(kv);

        let kv = FileKv::open(&path).unwrap();
        assert_eq!(kv.get("posts").unwrap().as_deref(), Some("[]"));
        assert_eq!(kv.get("prefs.theme").unwrap().as_deref(), Some("mint"));
    }

    #[test]
    fn remove_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");

        let kv = FileKv::open(&path).unwrap();
        kv.set("k", "v").unwrap();
        assert!(kv.remove("k").unwrap());
        drop(kv);

        let kv = FileKv::open(&path).unwrap();
        assert!(kv.get("k").unwrap().is_none());
    }

    #[test]
    fn creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deep").join("cache.json");
        let kv = FileKv::open(&path).unwrap();
        kv.set("k", "v").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn corrupt_snapshot_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");
        fs::write(&path, "not json").unwrap();
        let err = FileKv::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::CorruptEntry { .. }));
    }
}
