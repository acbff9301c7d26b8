//! QR code payment and the UPI deep link it encodes.

use crate::error::FieldErrors;
use crate::money::Money;
use bloom_data::encode_component;
use serde::{Deserialize, Serialize};

/// Payee and note placed in the UPI link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpiPayee {
    /// Virtual payment address, e.g. `bouquetbar@paytm`.
    pub address: String,
    pub name: String,
    pub note: String,
}

impl Default for UpiPayee {
    fn default() -> Self {
        Self {
            address: "bouquetbar@paytm".to_string(),
            name: "Bouquet Bar".to_string(),
            note: "Payment for order".to_string(),
        }
    }
}

impl UpiPayee {
    /// `upi://pay?pa=..&pn=..&am=..&cu=INR&tn=..`
    pub fn payment_uri(&self, amount: Money) -> String {
        format!(
            "upi://pay?pa={}&pn={}&am={}&cu={}&tn={}",
            encode_address(&self.address),
            encode_component(&self.name),
            amount.to_decimal_string(),
            amount.currency.code(),
            encode_component(&self.note)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrCodeDetails {
    pub confirmed: bool,
    pub amount: Money,
}

impl QrCodeDetails {
    pub fn new(amount: Money, confirmed: bool) -> Self {
        Self { confirmed, amount }
    }

    /// Validate against the order's current final amount.
    pub fn validate(&self, order_total: Money) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if !self.confirmed {
            errors.add("confirmed", "Please confirm QR Code payment");
        }
        let one = Money::from_major(1, self.amount.currency);
        if self.amount.amount_cents < one.amount_cents {
            errors.add("amount", "Amount must be specified");
        } else if self.amount != order_total {
            errors.add("amount", "Amount does not match the order total");
        }
        errors.into_result()
    }

    pub fn masked_summary(&self) -> String {
        if self.confirmed {
            format!("QR Code Payment - {}", self.amount.display())
        } else {
            "QR Code Payment".to_string()
        }
    }
}

/// Encode a payment address, leaving its `@` separators literal.
fn encode_address(address: &str) -> String {
    address
        .split('@')
        .map(encode_component)
        .collect::<Vec<_>>()
        .join("@")
}
