//! Byte-level key-value backends.
//!
//! The storefront persists its state through [`KvStore`]. On `wasm32` the
//! Spin key-value store backs it; everywhere else (tests, the CLI, offline
//! sessions) a process-local [`MemoryStore`] does.

use crate::CacheError;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

/// A raw key-value store.
pub trait KvStore {
    /// Read the bytes stored under `key`.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError>;

    /// Remove `key`. Removing a missing key is not an error.
    fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// Check whether `key` holds a value.
    fn exists(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.get(key)?.is_some())
    }

    /// All keys currently stored.
    fn keys(&self) -> Result<Vec<String>, CacheError>;
}

/// In-process store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> CacheError {
    CacheError::StoreError("memory store lock poisoned".to_string())
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries.remove(key);
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool, CacheError> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.contains_key(key))
    }

    fn keys(&self) -> Result<Vec<String>, CacheError> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.keys().cloned().collect())
    }
}

impl<S: KvStore + ?Sized> KvStore for &S {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        (**self).delete(key)
    }

    fn exists(&self, key: &str) -> Result<bool, CacheError> {
        (**self).exists(key)
    }

    fn keys(&self) -> Result<Vec<String>, CacheError> {
        (**self).keys()
    }
}

impl<S: KvStore + ?Sized> KvStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        (**self).delete(key)
    }

    fn exists(&self, key: &str) -> Result<bool, CacheError> {
        (**self).exists(key)
    }

    fn keys(&self) -> Result<Vec<String>, CacheError> {
        (**self).keys()
    }
}

/// Spin's key-value store.
#[cfg(target_arch = "wasm32")]
pub struct SpinStore {
    store: spin_sdk::key_value::Store,
}

#[cfg(target_arch = "wasm32")]
impl SpinStore {
    /// Open the default store.
    pub fn open_default() -> Result<Self, CacheError> {
        let store = spin_sdk::key_value::Store::open_default()
            .map_err(|e| CacheError::OpenError(e.to_string()))?;
        Ok(Self { store })
    }

    /// Open a named store.
    pub fn open(name: &str) -> Result<Self, CacheError> {
        let store = spin_sdk::key_value::Store::open(name)
            .map_err(|e| CacheError::OpenError(e.to_string()))?;
        Ok(Self { store })
    }
}

#[cfg(target_arch = "wasm32")]
impl KvStore for SpinStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        self.store
            .get(key)
            .map_err(|e| CacheError::StoreError(e.to_string()))
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        self.store
            .set(key, value)
            .map_err(|e| CacheError::StoreError(e.to_string()))
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.store
            .delete(key)
            .map_err(|e| CacheError::StoreError(e.to_string()))
    }

    fn exists(&self, key: &str) -> Result<bool, CacheError> {
        self.store
            .exists(key)
            .map_err(|e| CacheError::StoreError(e.to_string()))
    }

    fn keys(&self) -> Result<Vec<String>, CacheError> {
        self.store
            .get_keys()
            .map_err(|e| CacheError::StoreError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.is_empty());

        store.set("cart:guest", b"{}").unwrap();
        assert_eq!(store.get("cart:guest").unwrap(), Some(b"{}".to_vec()));
        assert!(store.exists("cart:guest").unwrap());

        store.delete("cart:guest").unwrap();
        assert_eq!(store.get("cart:guest").unwrap(), None);
        store.delete("cart:guest").unwrap();
    }

    #[test]
    fn test_memory_store_clones_share_entries() {
        let store = MemoryStore::new();
        let other = store.clone();
        store.set("a", b"1").unwrap();
        assert_eq!(other.get("a").unwrap(), Some(b"1".to_vec()));
        assert_eq!(other.len(), 1);
    }

    #[test]
    fn test_keys_sorted() {
        let store = MemoryStore::new();
        store.set("b", b"2").unwrap();
        store.set("a", b"1").unwrap();
        assert_eq!(store.keys().unwrap(), vec!["a", "b"]);
    }
}
