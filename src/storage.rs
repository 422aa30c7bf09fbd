//! Durable key-value storage.
//!
//! Stands in for the browser's local storage: whole JSON documents stored
//! under fixed string keys. Two backends exist: [`MemoryStore`] for tests and
//! ephemeral runs, and [`FileStore`] which keeps one file per key in a
//! directory and survives restarts.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Slot holding the serialized cart lines.
pub const CART_KEY: &str = "silkcraft_cart";
/// Slot holding the signed-in mock user.
pub const USER_KEY: &str = "silkcraft_user";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("storage lock poisoned")]
    Poisoned,
}

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> { (**self).get(key) }
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> { (**self).set(key, value) }
    fn remove(&self, key: &str) -> Result<(), StorageError> { (**self).remove(key) }
}

/// Storage handle shared between the cart store and the auth context.
pub type SharedStore = Arc<dyn KeyValueStore>;

/// Reads and decodes a document. Absent, unreadable or malformed content
/// all come back as `None`.
pub fn load_json<T: DeserializeOwned>(store: &impl KeyValueStore, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to read stored document");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "discarding malformed stored document");
            None
        }
    }
}

pub fn save_json<T: Serialize + ?Sized>(store: &impl KeyValueStore, key: &str, value: &T) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    slots: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let slots = self.slots.read().map_err(|_| StorageError::Poisoned)?;
        Ok(slots.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut slots = self.slots.write().map_err(|_| StorageError::Poisoned)?;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut slots = self.slots.write().map_err(|_| StorageError::Poisoned)?;
        slots.remove(key);
        Ok(())
    }
}

/// Prefixes every key with a namespace so several sessions can share one
/// backend without seeing each other's documents.
#[derive(Clone)]
pub struct ScopedStore {
    inner: SharedStore,
    namespace: String,
}

impl ScopedStore {
    pub fn new(inner: SharedStore, namespace: impl Into<String>) -> Self {
        Self { inner, namespace: namespace.into() }
    }

    fn scoped(&self, key: &str) -> String { format!("{}_{key}", self.namespace) }
}

impl KeyValueStore for ScopedStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> { self.inner.get(&self.scoped(key)) }
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> { self.inner.set(&self.scoped(key), value) }
    fn remove(&self, key: &str) -> Result<(), StorageError> { self.inner.remove(&self.scoped(key)) }
}

/// One `<key>.json` file per slot under `dir`.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self { Self { dir: dir.into() } }
    pub fn dir(&self) -> &Path { &self.dir }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid { return Err(StorageError::InvalidKey(key.to_string())); }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.path_for(key)?) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir)?;
        // Write then rename so a crash never leaves a half-written document.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.path_for(key)?) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get(CART_KEY).unwrap(), None);
        store.set(CART_KEY, "[]").unwrap();
        assert_eq!(store.get(CART_KEY).unwrap().as_deref(), Some("[]"));
        store.remove(CART_KEY).unwrap();
        assert_eq!(store.get(CART_KEY).unwrap(), None);
    }

    #[test]
    fn test_memory_store_clones_share_slots() {
        let store = MemoryStore::new();
        let other = store.clone();
        store.set(USER_KEY, "{}").unwrap();
        assert!(other.get(USER_KEY).unwrap().is_some());
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        FileStore::new(dir.path()).set(USER_KEY, r#"{"a":1}"#).unwrap();
        let reopened = FileStore::new(dir.path());
        assert_eq!(reopened.get(USER_KEY).unwrap().as_deref(), Some(r#"{"a":1}"#));
        reopened.remove(USER_KEY).unwrap();
        reopened.remove(USER_KEY).unwrap();
        assert_eq!(reopened.get(USER_KEY).unwrap(), None);
    }

    #[test]
    fn test_file_store_rejects_path_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert!(matches!(store.set("../escape", "x"), Err(StorageError::InvalidKey(_))));
    }

    #[test]
    fn test_scoped_stores_are_isolated() {
        let shared: SharedStore = Arc::new(MemoryStore::new());
        let a = ScopedStore::new(shared.clone(), "a1");
        let b = ScopedStore::new(shared.clone(), "b2");
        a.set(CART_KEY, "[1]").unwrap();
        assert_eq!(b.get(CART_KEY).unwrap(), None);
        assert_eq!(shared.get("a1_silkcraft_cart").unwrap().as_deref(), Some("[1]"));
        a.remove(CART_KEY).unwrap();
        assert_eq!(a.get(CART_KEY).unwrap(), None);
    }

    #[test]
    fn test_load_json_tolerates_garbage() {
        let store = MemoryStore::new();
        store.set(CART_KEY, "{not json").unwrap();
        assert_eq!(load_json::<Vec<u32>>(&store, CART_KEY), None);
        save_json(&store, CART_KEY, &vec![1u32, 2]).unwrap();
        assert_eq!(load_json::<Vec<u32>>(&store, CART_KEY), Some(vec![1, 2]));
    }
}
