//! Net banking form.

use crate::error::FieldErrors;
use serde::{Deserialize, Serialize};

/// Banks offered on the net banking picker: `(code, name)`.
pub const SUPPORTED_BANKS: [(&str, &str); 12] = [
    ("sbi", "State Bank of India"),
    ("hdfc", "HDFC Bank"),
    ("icici", "ICICI Bank"),
    ("axis", "Axis Bank"),
    ("kotak", "Kotak Mahindra Bank"),
    ("indusind", "IndusInd Bank"),
    ("yes", "Yes Bank"),
    ("pnb", "Punjab National Bank"),
    ("bob", "Bank of Baroda"),
    ("canara", "Canara Bank"),
    ("union", "Union Bank of India"),
    ("indian", "Indian Bank"),
];

/// Look up a bank's display name by code.
pub fn bank_name(code: &str) -> Option<&'static str> {
    let code = code.trim();
    SUPPORTED_BANKS
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code))
        .map(|(_, name)| *name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    #[default]
    Savings,
    Current,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Savings => "savings",
            AccountType::Current => "current",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetBankingDetails {
    /// Bank code from [`SUPPORTED_BANKS`].
    #[serde(rename = "bankName")]
    pub bank_code: String,
    #[serde(default)]
    pub account_type: AccountType,
}

impl NetBankingDetails {
    pub fn new(bank_code: impl Into<String>, account_type: AccountType) -> Self {
        Self {
            bank_code: bank_code.into(),
            account_type,
        }
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.bank_code.trim().is_empty() {
            errors.add("bankName", "Please select a bank");
        } else if bank_name(&self.bank_code).is_none() {
            errors.add("bankName", "Please select a supported bank");
        }
        errors.into_result()
    }

    /// "HDFC Bank - savings"
    pub fn masked_summary(&self) -> String {
        if self.bank_code.trim().is_empty() {
            return "Net Banking".to_string();
        }
        let bank = bank_name(&self.bank_code).unwrap_or(self.bank_code.as_str());
        format!("{} - {}", bank, self.account_type.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bank_lookup() {
        assert_eq!(bank_name("hdfc"), Some("HDFC Bank"));
        assert_eq!(bank_name("SBI"), Some("State Bank of India"));
        assert_eq!(bank_name("fakebank"), None);
    }

    #[test]
    fn test_validation() {
        assert_eq!(
            NetBankingDetails::default().validate().unwrap_err().get("bankName"),
            Some("Please select a bank")
        );
        assert!(NetBankingDetails::new("nope", AccountType::Savings)
            .validate()
            .is_err());
        assert!(NetBankingDetails::new("kotak", AccountType::Current)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_account_type_defaults_to_savings() {
        let details: NetBankingDetails = serde_json::from_str(r#"{"bankName":"axis"}"#).unwrap();
        assert_eq!(details.account_type, AccountType::Savings);
        assert_eq!(details.masked_summary(), "Axis Bank - savings");
    }
}
