//! Signed-in session lifecycle.

use crate::user::{AuthResponse, User};
use crate::AuthError;
use bloom_cache::{Cache, KvStore, MemoryStore, SessionId};
use bloom_commerce::UserId;
use serde::{Deserialize, Serialize};

/// Key namespace for stored auth sessions.
const AUTH_NAMESPACE: &str = "auth";

/// A signed-in user and their bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub user: User,
    /// Bearer token, when the server issued one.
    pub token: Option<String>,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of last activity.
    pub last_activity_at: i64,
    /// Unix timestamp when the session expires.
    pub expires_at: i64,
}

impl AuthSession {
    /// Default session duration: 7 days.
    pub const DEFAULT_DURATION_SECS: i64 = 7 * 24 * 60 * 60;

    pub fn new(user: User, token: Option<String>) -> Self {
        let now = current_timestamp();
        Self {
            user,
            token,
            created_at: now,
            last_activity_at: now,
            expires_at: now + Self::DEFAULT_DURATION_SECS,
        }
    }

    /// Create session with custom duration.
    pub fn with_duration(mut self, duration_secs: i64) -> Self {
        self.expires_at = self.created_at + duration_secs;
        self
    }

    pub fn user_id(&self) -> &UserId {
        &self.user.id
    }

    pub fn bearer_token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_expired(&self) -> bool {
        current_timestamp() > self.expires_at
    }

    /// Validate the session, returning error if expired.
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.is_expired() {
            Err(AuthError::SessionExpired)
        } else {
            Ok(())
        }
    }

    /// Update last activity timestamp.
    pub fn touch(&mut self) {
        self.last_activity_at = current_timestamp();
    }
}

impl From<AuthResponse> for AuthSession {
    fn from(response: AuthResponse) -> Self {
        AuthSession::new(response.user, response.token)
    }
}

/// Stores auth sessions in the cache, keyed by storefront session id.
pub struct AuthStore<S = MemoryStore> {
    cache: Cache<S>,
}

impl<S: KvStore> AuthStore<S> {
    pub fn new(cache: Cache<S>) -> Self {
        Self { cache }
    }

    /// Persist `session` for the browser session `id`.
    pub fn save(&self, id: &SessionId, session: &AuthSession) -> Result<(), AuthError> {
        tracing::info!(session = %id, user = %session.user.id, "signed in");
        self.cache.set(&Self::key(id), session)?;
        Ok(())
    }

    /// The stored session, if any. Expired sessions are removed and reported
    /// as absent.
    pub fn load(&self, id: &SessionId) -> Result<Option<AuthSession>, AuthError> {
        let key = Self::key(id);
        match self.cache.get::<AuthSession>(&key)? {
            Some(session) if session.is_expired() => {
                tracing::debug!(session = %id, "dropping expired auth session");
                self.cache.delete(&key)?;
                Ok(None)
            }
            other => Ok(other),
        }
    }

    /// The stored session or [`AuthError::SessionNotFound`].
    pub fn require(&self, id: &SessionId) -> Result<AuthSession, AuthError> {
        self.load(id)?.ok_or(AuthError::SessionNotFound)
    }

    /// Record activity on the stored session.
    pub fn touch(&self, id: &SessionId) -> Result<Option<AuthSession>, AuthError> {
        let Some(mut session) = self.load(id)? else {
            return Ok(None);
        };
        session.touch();
        self.cache.set(&Self::key(id), &session)?;
        Ok(Some(session))
    }

    /// Forget the session (logout).
    pub fn clear(&self, id: &SessionId) -> Result<(), AuthError> {
        tracing::info!(session = %id, "signed out");
        self.cache.delete(&Self::key(id))?;
        Ok(())
    }

    fn key(id: &SessionId) -> String {
        bloom_cache::cache_key!(AUTH_NAMESPACE, id)
    }
}

/// Get current Unix timestamp.
pub(crate) fn current_timestamp() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
