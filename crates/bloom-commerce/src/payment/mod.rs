//! Simulated payment methods.
//!
//! No gateway is ever contacted: a payment is "valid" when the selected
//! method's form passes its rules. Card numbers are Luhn-checked, UPI ids and
//! bank codes are format-checked, and cash on delivery and QR code require an
//! explicit confirmation.

mod card;
mod details;
mod error;
mod method;
mod netbanking;
mod qr;
mod upi;

pub use card::{format_card_number, luhn_valid, CardDetails, MAX_EXPIRY_YEARS_AHEAD};
pub use details::{CodDetails, PaymentContext, PaymentData, PaymentDetails};
pub use error::PaymentError;
pub use method::PaymentMethod;
pub use netbanking::{bank_name, AccountType, NetBankingDetails, SUPPORTED_BANKS};
pub use qr::{QrCodeDetails, UpiPayee};
pub use upi::{is_valid_upi_id, mask_upi_id, UpiDetails};
