//! Commerce error types.

use crate::payment::PaymentError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Errors that can occur in storefront commerce operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Product cannot currently be purchased.
    #[error("Product is out of stock: {0}")]
    OutOfStock(String),

    /// Item not in cart.
    #[error("Item not in cart: {0}")]
    ItemNotInCart(String),

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Quantity exceeds maximum allowed.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(i64, i64),

    /// Coupon code unknown.
    #[error("Invalid coupon code: {0}")]
    InvalidCouponCode(String),

    /// Coupon exists but is switched off.
    #[error("Coupon is no longer active: {0}")]
    CouponInactive(String),

    /// Cart subtotal is below the coupon's minimum.
    #[error("Coupon {code} requires a minimum order of {minimum}")]
    CouponMinimumNotMet { code: String, minimum: String },

    /// Delivery option not offered.
    #[error("Unknown delivery option: {0}")]
    UnknownDeliveryOption(String),

    /// Invalid checkout state transition.
    #[error("Invalid checkout transition from {from} to {to}")]
    InvalidCheckoutTransition { from: String, to: String },

    /// Checkout cannot proceed; lists every missing piece.
    #[error("Checkout incomplete: {}", .0.join(", "))]
    CheckoutIncomplete(Vec<String>),

    /// Order status string not recognised.
    #[error("Unknown order status: {0}")]
    UnknownOrderStatus(String),

    /// Address type string not recognised.
    #[error("Unknown address type: {0}")]
    UnknownAddressType(String),

    /// Form input failed validation.
    #[error("Invalid input: {0}")]
    InvalidFields(FieldErrors),

    /// Payment details failed validation.
    #[error(transparent)]
    Payment(#[from] PaymentError),

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Validation error.
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::SerializationError(e.to_string())
    }
}

/// Per-field validation messages, keyed by the form's camelCase field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error. The first message for a field wins.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `Ok(())` when empty, otherwise the errors themselves.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl From<FieldErrors> for CommerceError {
    fn from(errors: FieldErrors) -> Self {
        CommerceError::InvalidFields(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_errors_first_message_wins() {
        let mut errors = FieldErrors::new();
        errors.add("phone", "Phone number is required");
        errors.add("phone", "Invalid phone number");
        assert_eq!(errors.get("phone"), Some("Phone number is required"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_field_errors_display() {
        let mut errors = FieldErrors::new();
        errors.add("city", "City is required");
        errors.add("state", "State is required");
        let err = CommerceError::from(errors);
        assert_eq!(
            err.to_string(),
            "Invalid input: city: City is required; state: State is required"
        );
    }

    #[test]
    fn test_checkout_incomplete_lists_everything() {
        let err = CommerceError::CheckoutIncomplete(vec![
            "Cart is empty".to_string(),
            "Shipping address not selected".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "Checkout incomplete: Cart is empty, Shipping address not selected"
        );
    }
}
