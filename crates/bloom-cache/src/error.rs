//! Cache error types.

use thiserror::Error;

/// Errors from the key-value layer behind carts and sign-in state.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The key-value store could not be opened.
    #[error("Cannot open key-value store: {0}")]
    OpenError(String),

    /// A cached value did not round-trip through JSON.
    #[error("Cached value is not valid JSON: {0}")]
    SerializeError(#[from] serde_json::Error),

    /// The backing store rejected a read, write or delete.
    #[error("Key-value store error: {0}")]
    StoreError(String),

    #[error("No cached entry for {0}")]
    NotFound(String),
}
