//! Typed key-value storage for the Bouquet Bar storefront.
//!
//! Holds what a browser storefront would keep in local storage: the cart
//! session, the signed-in user and anything else that must survive a reload.
//! Values are stored as JSON over a pluggable [`KvStore`].
//!
//! # Example
//!
//! ```rust
//! use bloom_cache::{cache_key, Cache};
//!
//! let cache = Cache::in_memory();
//! let key = cache_key!("wishlist", "sess_abc");
//!
//! cache.set(&key, &vec!["prod_rose", "prod_lily"]).unwrap();
//! let saved: Option<Vec<String>> = cache.get(&key).unwrap();
//! assert_eq!(saved.unwrap().len(), 2);
//!
//! cache.delete(&key).unwrap();
//! ```

mod cache;
mod error;
mod session;
mod store;

pub use cache::Cache;
pub use error::CacheError;
pub use session::{Session, SessionData, SessionId};
#[cfg(target_arch = "wasm32")]
pub use store::SpinStore;
pub use store::{KvStore, MemoryStore};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, KvStore, MemoryStore, Session, SessionId};
}
