//! Newtype IDs for type-safe identifiers.
//!
//! Backend ids arrive as strings (UUIDs or numeric strings); locally generated
//! ids carry a short prefix so they are recognisable in logs, e.g.
//! `line_18c3f2a9b01_0`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate newtype ID structs.
macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Prefix used for locally generated ids.
            pub const PREFIX: &'static str = $prefix;

            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generate a new locally unique ID.
            pub fn generate() -> Self {
                Self(generate_id($prefix))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }

            /// Whether this id was generated on the client rather than issued
            /// by the backend.
            pub fn is_local(&self) -> bool {
                self.0
                    .strip_prefix($prefix)
                    .is_some_and(|rest| rest.starts_with('_'))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(ProductId, "prod");
define_id!(LineItemId, "line");
define_id!(CartId, "cart");
define_id!(OrderId, "ord");
define_id!(UserId, "user");
define_id!(AddressId, "addr");
define_id!(CouponId, "cpn");
define_id!(DeliveryOptionId, "dlv");
define_id!(CourseId, "course");

/// Generate a unique ID from the clock and a process-wide counter.
fn generate_id(prefix: &str) -> String {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let counter = COUNTER.fetch_add(1, Ordering::Relaxed);

    format!("{}_{:x}_{:x}", prefix, millis, counter)
}
