//! Key-value cache with automatic serialization.

use crate::store::{KvStore, MemoryStore};
use crate::CacheError;
use serde::{de::DeserializeOwned, Serialize};

/// Type-safe cache over a [`KvStore`].
///
/// Values are stored as JSON so anything implementing `Serialize` and
/// `DeserializeOwned` can be cached.
#[derive(Debug, Clone)]
pub struct Cache<S = MemoryStore> {
    store: S,
}

impl Cache<MemoryStore> {
    /// A cache over a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }
}

#[cfg(target_arch = "wasm32")]
impl Cache<crate::store::SpinStore> {
    /// Open the default Spin key-value store.
    pub fn open_default() -> Result<Self, CacheError> {
        Ok(Self::new(crate::store::SpinStore::open_default()?))
    }

    /// Open a named Spin key-value store.
    pub fn open(name: &str) -> Result<Self, CacheError> {
        Ok(Self::new(crate::store::SpinStore::open(name)?))
    }
}

impl<S: KvStore> Cache<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let cart: Option<Cart> = cache.get("cart:sess_abc")?;
    /// ```
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.store.get(key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Get a value, failing with [`CacheError::NotFound`] if absent.
    pub fn require<T: DeserializeOwned>(&self, key: &str) -> Result<T, CacheError> {
        self.get(key)?
            .ok_or_else(|| CacheError::NotFound(key.to_string()))
    }

    /// Set a value in the cache.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(value)?;
        self.store.set(key, &bytes)
    }

    /// Delete a value from the cache.
    pub fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.store.delete(key)
    }

    /// Check if a key exists in the cache.
    pub fn exists(&self, key: &str) -> Result<bool, CacheError> {
        self.store.exists(key)
    }

    /// Get all keys in the cache.
    pub fn keys(&self) -> Result<Vec<String>, CacheError> {
        self.store.keys()
    }
}

/// Helper to build cache keys with namespacing.
///
/// # Example
///
/// ```rust
/// use bloom_cache::cache_key;
///
/// let key = cache_key!("cart", "sess_abc");
/// assert_eq!(key, "cart:sess_abc");
/// ```
#[macro_export]
macro_rules! cache_key {
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix);
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Saved {
        items: Vec<String>,
        total: i64,
    }

    #[test]
    fn test_set_and_get() {
        let cache = Cache::in_memory();
        let saved = Saved {
            items: vec!["rose".into()],
            total: 129900,
        };
        cache.set("cart:u1", &saved).unwrap();
        assert_eq!(cache.get::<Saved>("cart:u1").unwrap(), Some(saved));
        assert!(cache.get::<Saved>("cart:u2").unwrap().is_none());
    }

    #[test]
    fn test_require_missing() {
        let cache = Cache::in_memory();
        assert!(matches!(
            cache.require::<Saved>("missing"),
            Err(CacheError::NotFound(_))
        ));
    }

    #[test]
    fn test_wrong_shape_is_serialize_error() {
        let cache = Cache::in_memory();
        cache.set("k", &"just a string").unwrap();
        assert!(matches!(
            cache.get::<Saved>("k"),
            Err(CacheError::SerializeError(_))
        ));
    }

    #[test]
    fn test_namespaced_keys() {
        let cache = Cache::in_memory();
        cache.set(&cache_key!("cart", "a"), &1).unwrap();
        cache.set(&cache_key!("cart", "b"), &2).unwrap();
        cache.set(&cache_key!("auth", "a"), &3).unwrap();
        assert_eq!(cache.keys().unwrap(), vec!["auth:a", "cart:a", "cart:b"]);
        cache.delete("cart:a").unwrap();
        assert!(!cache.exists("cart:a").unwrap());
    }

    #[test]
    fn test_cache_key_macro_multiple_parts() {
        assert_eq!(cache_key!("session", "storefront", 7), "session:storefront:7");
    }
}
