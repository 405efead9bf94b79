//! Persistence port for collision documents.
//!
//! The editor and the runtime only see the trait; tests and demos use
//! [`MemoryStore`], shipping builds use [`DirStore`] (one file per key).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::CollisionError;

/// Keyed byte storage. Keys follow the `<mapname-lowercase>-collisions.json`
/// convention from [`collision_file_name`](crate::document::collision_file_name).
pub trait CollisionStore {
    /// `Ok(None)` when the key has never been written.
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, CollisionError>;
    fn save(&mut self, key: &str, bytes: &[u8]) -> Result<(), CollisionError>;
    fn remove(&mut self, key: &str) -> Result<(), CollisionError>;
}

/// In-memory backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CollisionStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, CollisionError> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, bytes: &[u8]) -> Result<(), CollisionError> {
        self.entries.insert(key.to_owned(), bytes.to_vec());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), CollisionError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Directory-backed store: each key is a file under `root`.
#[derive(Debug)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    /// Creates `root` if missing.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, CollisionError> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|source| CollisionError::Io {
            path: root.clone(),
            source,
        })?;
        Ok(DirStore { root })
    }

    fn key_path(&self, key: &str) -> Result<PathBuf, CollisionError> {
        // Keys are file names, not paths; reject separators outright.
        if key.is_empty() || key.contains('/') || key.contains('\\') || key.contains("..") {
            return Err(CollisionError::Store(format!("invalid store key: {key:?}")));
        }
        Ok(self.root.join(key))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl CollisionStore for DirStore {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, CollisionError> {
        let path = self.key_path(key)?;
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(CollisionError::Io { path, source }),
        }
    }

    fn save(&mut self, key: &str, bytes: &[u8]) -> Result<(), CollisionError> {
        let path = self.key_path(key)?;
        std::fs::write(&path, bytes).map_err(|source| CollisionError::Io { path, source })
    }

    fn remove(&mut self, key: &str) -> Result<(), CollisionError> {
        let path = self.key_path(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(CollisionError::Io { path, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_root() -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock went backwards")
            .as_nanos();
        std::env::temp_dir().join(format!("collision_store_{nanos}"))
    }

    #[test]
    fn memory_store_round_trips() {
        let mut store = MemoryStore::new();
        assert_eq!(store.load("k").unwrap(), None);
        store.save("k", b"data").unwrap();
        assert_eq!(store.load("k").unwrap().as_deref(), Some(&b"data"[..]));
        store.remove("k").unwrap();
        assert_eq!(store.load("k").unwrap(), None);
    }

    #[test]
    fn dir_store_round_trips_and_tolerates_missing_keys() {
        let mut store = DirStore::open(temp_root()).unwrap();
        assert_eq!(store.load("forest-collisions.json").unwrap(), None);
        store.save("forest-collisions.json", b"{}").unwrap();
        assert_eq!(
            store.load("forest-collisions.json").unwrap().as_deref(),
            Some(&b"{}"[..])
        );
        store.remove("forest-collisions.json").unwrap();
        store.remove("forest-collisions.json").unwrap(); // second remove is a no-op
    }

    #[test]
    fn dir_store_rejects_path_keys() {
        let store = DirStore::open(temp_root()).unwrap();
        let err = store.load("../escape.json").unwrap_err();
        assert!(matches!(err, CollisionError::Store(_)));
    }
}
