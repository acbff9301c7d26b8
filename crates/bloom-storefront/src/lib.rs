//! Storefront layer for Bouquet Bar.
//!
//! Ties the domain crates to the REST API:
//!
//! - **Session**: Cart state with optimistic server sync, checkout wizard, order placement
//! - **Api**: Typed client for `/api/*` endpoints
//! - **Location**: Reverse geocoding into the address form
//! - **Enquiry**: Custom bouquet, course enrollment and landing-page forms
//! - **Content**: Testimonials, blog posts, courses and shop details
//!
//! # Example
//!
//! ```rust
//! use bloom_cache::Cache;
//! use bloom_commerce::prelude::*;
//! use bloom_data::MemoryTransport;
//! use bloom_storefront::{StoreConfig, StorefrontApi, StorefrontSession};
//!
//! let api = StorefrontApi::new(MemoryTransport::new(), "http://localhost:5000");
//! let mut session =
//!     StorefrontSession::start(StoreConfig::default(), api, Cache::in_memory()).unwrap();
//!
//! let rose = Product::new("rose-12", "Red Rose Bouquet", Money::inr(1299));
//! session.add_to_cart(&rose, 2).unwrap();
//! session.apply_coupon("FIRSTBLOOM").unwrap();
//!
//! let totals = session.totals().unwrap();
//! assert_eq!(totals.final_amount.display(), "₹2,078.4");
//! ```

pub mod api;
pub mod config;
pub mod content;
pub mod enquiry;
pub mod error;
pub mod location;
pub mod session;

pub use api::{CartPayload, CartPayloadItem, StorefrontApi};
pub use config::StoreConfig;
pub use error::{Result, StorefrontError};
pub use location::{Coordinates, DetectedAddress, Geocoder, LocationDetection, PositionError};
pub use session::{CheckoutState, StorefrontSession};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::api::{CartPayload, StorefrontApi};
    pub use crate::config::StoreConfig;
    pub use crate::content::{BlogPost, Course, Testimonial, TestimonialKind};
    pub use crate::enquiry::{
        ContactForm, CustomBouquetForm, EnrollmentForm, NewsletterSignup, Occasion,
    };
    pub use crate::error::{Result, StorefrontError};
    pub use crate::location::{Coordinates, Geocoder, PositionError};
    pub use crate::session::{CheckoutState, StorefrontSession};
}
