//! Versioned session storage.

use crate::store::{KvStore, MemoryStore};
use crate::{Cache, CacheError};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Default key namespace.
const DEFAULT_NAMESPACE: &str = "session";

/// A unique session identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Create a session ID from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new random session ID.
    pub fn generate() -> Self {
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
        use rand::Rng;

        let bytes: [u8; 18] = rand::thread_rng().gen();
        Self(format!("sess_{}", URL_SAFE_NO_PAD.encode(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Session data as stored in the cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData<T> {
    pub id: SessionId,
    pub data: T,
    /// Bumped on every write.
    pub version: u64,
    /// Unix seconds.
    pub created_at: u64,
    /// Unix seconds.
    pub last_accessed: u64,
}

/// Typed session storage over a cache.
///
/// # Example
///
/// ```rust
/// use bloom_cache::{Cache, Session, SessionId};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize, Default, Clone)]
/// struct Visit {
///     pages: u32,
/// }
///
/// let sessions = Session::<Visit>::new(Cache::in_memory());
/// let id = SessionId::generate();
///
/// sessions.set(&id, &Visit { pages: 1 }).unwrap();
/// let version = sessions.set(&id, &Visit { pages: 2 }).unwrap();
/// assert_eq!(version, 2);
/// assert_eq!(sessions.get(&id).unwrap().unwrap().pages, 2);
/// ```
pub struct Session<T, S = MemoryStore> {
    cache: Cache<S>,
    namespace: String,
    _phantom: std::marker::PhantomData<T>,
}

impl<T, S> Session<T, S>
where
    T: Serialize + DeserializeOwned + Clone,
    S: KvStore,
{
    /// Sessions stored under the default namespace.
    pub fn new(cache: Cache<S>) -> Self {
        Self::with_namespace(cache, DEFAULT_NAMESPACE)
    }

    /// Sessions stored under `namespace:<id>`.
    pub fn with_namespace(cache: Cache<S>, namespace: impl Into<String>) -> Self {
        Self {
            cache,
            namespace: namespace.into(),
            _phantom: std::marker::PhantomData,
        }
    }

    pub fn cache(&self) -> &Cache<S> {
        &self.cache
    }

    /// Get session data if it exists.
    pub fn get(&self, id: &SessionId) -> Result<Option<T>, CacheError> {
        Ok(self.get_versioned(id)?.map(|s| s.data))
    }

    /// Get full session data including version.
    pub fn get_versioned(&self, id: &SessionId) -> Result<Option<SessionData<T>>, CacheError> {
        self.cache.get::<SessionData<T>>(&self.session_key(id))
    }

    /// Set session data unconditionally.
    pub fn set(&self, id: &SessionId, data: &T) -> Result<u64, CacheError> {
        let current = self.get_versioned(id)?;
        let version = current.as_ref().map(|s| s.version + 1).unwrap_or(1);
        self.write(id, data, version, current.map(|s| s.created_at))?;
        Ok(version)
    }

    /// Delete a session.
    pub fn delete(&self, id: &SessionId) -> Result<(), CacheError> {
        tracing::debug!(session = %id, namespace = %self.namespace, "deleting session");
        self.cache.delete(&self.session_key(id))
    }

    fn write(
        &self,
        id: &SessionId,
        data: &T,
        version: u64,
        created_at: Option<u64>,
    ) -> Result<(), CacheError> {
        let now = current_timestamp();
        let session_data = SessionData {
            id: id.clone(),
            data: data.clone(),
            version,
            created_at: created_at.unwrap_or(now),
            last_accessed: now,
        };
        self.cache.set(&self.session_key(id), &session_data)
    }

    fn session_key(&self, id: &SessionId) -> String {
        crate::cache_key!(self.namespace.as_str(), id)
    }
}

fn current_timestamp() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct CartState {
        items: Vec<String>,
    }

    fn sessions() -> Session<CartState> {
        Session::with_namespace(Cache::in_memory(), "cart")
    }

    #[test]
    fn test_session_id_generate_format() {
        let id = SessionId::generate();
        let s = id.as_str();

        assert!(s.starts_with("sess_"));
        // 18 bytes base64 = 24 chars, plus "sess_"
        assert_eq!(s.len(), 29);
    }

    #[test]
    fn test_session_id_generate_uniqueness() {
        assert_ne!(SessionId::generate(), SessionId::generate());
    }

    #[test]
    fn test_session_id_serialization() {
        let id = SessionId::new("sess_abc");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#""sess_abc""#);
        assert_eq!(serde_json::from_str::<SessionId>(&json).unwrap(), id);
    }

    #[test]
    fn test_set_bumps_version_and_keeps_created_at() {
        let sessions = sessions();
        let id = SessionId::new("s1");
        assert_eq!(sessions.set(&id, &CartState::default()).unwrap(), 1);
        let created = sessions.get_versioned(&id).unwrap().unwrap().created_at;

        let state = CartState {
            items: vec!["orchid".into()],
        };
        assert_eq!(sessions.set(&id, &state).unwrap(), 2);

        let stored = sessions.get_versioned(&id).unwrap().unwrap();
        assert_eq!(stored.data, state);
        assert_eq!(stored.created_at, created);
    }

    #[test]
    fn test_delete_leaves_other_sessions() {
        let sessions = sessions();
        sessions.set(&SessionId::new("a"), &CartState::default()).unwrap();
        sessions.set(&SessionId::new("b"), &CartState::default()).unwrap();
        sessions.delete(&SessionId::new("a")).unwrap();
        assert!(sessions.get(&SessionId::new("a")).unwrap().is_none());
        assert!(sessions.get(&SessionId::new("b")).unwrap().is_some());
        assert!(sessions.cache().exists("cart:b").unwrap());
    }
}
