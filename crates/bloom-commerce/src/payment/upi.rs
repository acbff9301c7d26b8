//! UPI payment form.

use crate::error::FieldErrors;
pub use crate::validate::is_valid_upi_id;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpiDetails {
    pub upi_id: String,
}

impl UpiDetails {
    pub fn new(upi_id: impl Into<String>) -> Self {
        Self {
            upi_id: upi_id.into(),
        }
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.upi_id.is_empty() {
            errors.add("upiId", "UPI ID is required");
        } else if !is_valid_upi_id(&self.upi_id) {
            errors.add("upiId", "Invalid UPI ID format (e.g., user@paytm)");
        }
        errors.into_result()
    }

    /// `ab***@paytm`
    pub fn masked_summary(&self) -> String {
        let id = self.upi_id.trim();
        if id.is_empty() {
            "UPI Payment".to_string()
        } else {
            mask_upi_id(id)
        }
    }
}

/// Keep the first two characters of the handle and the provider, star the
/// rest. The last `@` splits handle from provider; ids too short to mask are
/// returned unchanged.
pub fn mask_upi_id(input: &str) -> String {
    let Some(at) = input.rfind('@') else {
        return input.to_string();
    };
    let (handle, provider) = input.split_at(at);
    let mut chars = handle.chars();
    let prefix: String = chars.by_ref().take(2).collect();
    if prefix.chars().count() < 2 {
        return input.to_string();
    }
    format!("{}***{}", prefix, provider)
}
