//! Payment method tags.

use crate::money::Money;
use serde::{Deserialize, Serialize};

/// The five simulated payment methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "card")]
    Card,
    #[serde(rename = "upi")]
    Upi,
    #[serde(rename = "netbanking")]
    NetBanking,
    #[serde(rename = "cod")]
    CashOnDelivery,
    #[serde(rename = "qrcode")]
    QrCode,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 5] = [
        PaymentMethod::Card,
        PaymentMethod::Upi,
        PaymentMethod::NetBanking,
        PaymentMethod::CashOnDelivery,
        PaymentMethod::QrCode,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::Upi => "upi",
            PaymentMethod::NetBanking => "netbanking",
            PaymentMethod::CashOnDelivery => "cod",
            PaymentMethod::QrCode => "qrcode",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "card" => Some(PaymentMethod::Card),
            "upi" => Some(PaymentMethod::Upi),
            "netbanking" => Some(PaymentMethod::NetBanking),
            "cod" => Some(PaymentMethod::CashOnDelivery),
            "qrcode" => Some(PaymentMethod::QrCode),
            _ => None,
        }
    }

    /// Title on the method picker.
    pub fn title(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "Credit/Debit Card",
            PaymentMethod::Upi => "UPI",
            PaymentMethod::NetBanking => "Net Banking",
            PaymentMethod::CashOnDelivery => "Cash on Delivery",
            PaymentMethod::QrCode => "QR Code",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "Pay securely with your card",
            PaymentMethod::Upi => "Pay instantly with UPI",
            PaymentMethod::NetBanking => "Pay through your bank",
            PaymentMethod::CashOnDelivery => "Pay when your order arrives",
            PaymentMethod::QrCode => "Scan QR code to pay instantly",
        }
    }

    /// Name used on the review page and in the order payload.
    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "Credit/Debit Card",
            PaymentMethod::Upi => "UPI Payment",
            PaymentMethod::NetBanking => "Net Banking",
            PaymentMethod::CashOnDelivery => "Cash on Delivery",
            PaymentMethod::QrCode => "QR Code Payment",
        }
    }

    /// Surcharge for the method. Only cash on delivery carries one.
    pub fn fee(&self, cod_fee: Money) -> Money {
        match self {
            PaymentMethod::CashOnDelivery => cod_fee,
            _ => Money::zero(cod_fee.currency),
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
