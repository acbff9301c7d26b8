//! Storefront error types.

use bloom_commerce::payment::PaymentError;
use bloom_commerce::{CommerceError, FieldErrors};
use thiserror::Error;

/// Message shown whenever reverse geocoding fails.
pub const LOCATION_FAILED: &str = "Failed to convert location to address. Please enter manually.";

/// Errors surfaced by the storefront session and API.
#[derive(Error, Debug)]
pub enum StorefrontError {
    /// Cart, checkout or order rule violated.
    #[error(transparent)]
    Commerce(#[from] CommerceError),

    /// Payment form invalid.
    #[error(transparent)]
    Payment(#[from] PaymentError),

    /// Sign-in, sign-up or session failure.
    #[error(transparent)]
    Auth(#[from] bloom_auth::AuthError),

    /// Local persistence failed.
    #[error("storage error: {0}")]
    Cache(#[from] bloom_cache::CacheError),

    /// The request never got a usable answer.
    #[error("network error: {0}")]
    Fetch(#[from] bloom_data::FetchError),

    /// The API answered with an error.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// A form failed validation.
    #[error("{0}")]
    InvalidForm(FieldErrors),

    /// An operation that needs a signed-in user.
    #[error("please sign in to continue")]
    NotSignedIn,

    /// An order is already being placed.
    #[error("an order is already being placed")]
    OrderInFlight,

    /// Reverse geocoding failed.
    #[error("Failed to convert location to address. Please enter manually.")]
    Location,

    /// The device could not report a position.
    #[error(transparent)]
    Position(#[from] crate::location::PositionError),

    /// Coordinates outside the valid range.
    #[error("invalid coordinates: {latitude}, {longitude}")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    /// Store configuration problem.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl StorefrontError {
    /// HTTP status when the API rejected the request.
    pub fn status(&self) -> Option<u16> {
        match self {
            StorefrontError::Api { status, .. } => Some(*status),
            StorefrontError::Fetch(e) => e.status(),
            _ => None,
        }
    }

    /// Field-level messages, if any.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            StorefrontError::InvalidForm(errors) => Some(errors),
            StorefrontError::Commerce(CommerceError::InvalidFields(errors)) => Some(errors),
            StorefrontError::Payment(PaymentError::Invalid { errors, .. }) => Some(errors),
            StorefrontError::Auth(e) => e.field_errors(),
            _ => None,
        }
    }
}

impl From<FieldErrors> for StorefrontError {
    fn from(errors: FieldErrors) -> Self {
        StorefrontError::InvalidForm(errors)
    }
}

/// Result alias for storefront operations.
pub type Result<T, E = StorefrontError> = std::result::Result<T, E>;
