//! Key/value store backends.

use crate::Store;
use anyhow::{Context, Result};
use std::{collections::BTreeMap, path::PathBuf};

/// In-memory store backed by `Vec<(String, String)>`.
///
/// Useful for tests and as a scratch store when persistence is unwanted.
#[derive(Clone, Default, Debug)]
pub struct InMemory {
    entries: Vec<(String, String)>,
}

impl InMemory {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for InMemory {
    fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        if let Some(existing) = self.entries.iter_mut().find(|(k, _)| k == key) {
            existing.1 = value;
        } else {
            self.entries.push((key.to_owned(), value));
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.retain(|(k, _)| k != key);
        Ok(())
    }
}

/// File-backed store: a JSON object map in a single file.
///
/// The whole map is rewritten on every mutation. An unreadable file is
/// treated as empty rather than fatal, matching how a browser store behaves
/// when its entry is gone.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open a store at `path`, loading existing entries if the file exists.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!("discarding unreadable store {}: {e}", path.display());
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };
        Ok(Self { path, entries })
    }

    /// The file backing this store.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let raw = serde_json::to_string(&self.entries)?;
        std::fs::write(&self.path, raw)
            .with_context(|| format!("failed to write {}", self.path.display()))
    }
}

impl Store for FileStore {
    fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.entries.insert(key.to_owned(), value);
        self.persist()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get() {
        let mut store = InMemory::new();
        assert!(store.get("history").is_none());

        store.set("history", "{}".into()).unwrap();
        assert_eq!(store.get("history").unwrap(), "{}");
    }

    #[test]
    fn set_overwrites() {
        let mut store = InMemory::new();
        store.set("k", "v1".into()).unwrap();
        store.set("k", "v2".into()).unwrap();
        assert_eq!(store.get("k").unwrap(), "v2");
    }

    #[test]
    fn file_store_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let mut store = FileStore::open(&path).unwrap();
        store.set("k", "v".into()).unwrap();
        drop(store);

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get("k").unwrap(), "v");
    }

    #[test]
    fn file_store_survives_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileStore::open(&path).unwrap();
        assert!(store.get("k").is_none());
    }

    #[test]
    fn remove_missing_key_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let mut store = FileStore::open(&path).unwrap();
        store.remove("ghost").unwrap();
        assert!(!path.exists());
    }
}
