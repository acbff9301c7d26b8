//! Card payment form.

use crate::error::FieldErrors;
use crate::validate::{char_len, is_digits, is_letters_and_spaces, is_month};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Years ahead a card expiry may be.
pub const MAX_EXPIRY_YEARS_AHEAD: i32 = 10;

/// Card details as typed. The CVV is never written to storage.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDetails {
    pub holder_name: String,
    /// May contain spaces as typed; they are stripped before validation.
    pub number: String,
    /// `MM`
    pub expiry_month: String,
    /// `YY`
    pub expiry_year: String,
    #[serde(skip_serializing, default)]
    pub cvv: String,
}

impl CardDetails {
    /// Card number with all whitespace removed.
    pub fn digits(&self) -> String {
        self.number.chars().filter(|c| !c.is_whitespace()).collect()
    }

    pub fn last4(&self) -> Option<String> {
        let digits = self.digits();
        if digits.len() < 4 || !digits.is_ascii() {
            return None;
        }
        Some(digits[digits.len() - 4..].to_string())
    }

    /// Validate against today's date.
    pub fn validate(&self, today: NaiveDate) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        if char_len(&self.holder_name) < 2 {
            errors.add("holderName", "Cardholder name must be at least 2 characters");
        } else if !is_letters_and_spaces(&self.holder_name) {
            errors.add("holderName", "Name should only contain letters and spaces");
        }

        let digits = self.digits();
        if !is_digits(&digits, 16) {
            errors.add("number", "Card number must be 16 digits");
        } else if !luhn_valid(&digits) {
            errors.add("number", "Invalid card number");
        }

        let month = parse_month(&self.expiry_month);
        if month.is_none() {
            errors.add("expiryMonth", "Invalid month format (MM)");
        }

        if !is_digits(&self.expiry_year, 2) {
            errors.add("expiryYear", "Invalid year format (YY)");
        } else {
            let year = 2000 + self.expiry_year.parse::<i32>().unwrap_or(0);
            let current = today.year();
            if year < current || year > current + MAX_EXPIRY_YEARS_AHEAD {
                errors.add("expiryYear", "Card has expired or invalid year");
            } else if let Some(month) = month {
                if year == current && month < today.month() {
                    errors.add("expiryMonth", "Card has expired");
                }
            }
        }

        if !is_digits(&self.cvv, 3) && !is_digits(&self.cvv, 4) {
            errors.add("cvv", "CVV must be 3 or 4 digits");
        }

        errors.into_result()
    }

    /// "Card ending in 3456", or the method title when no number is known.
    pub fn masked_summary(&self) -> String {
        match self.last4() {
            Some(last4) => format!("Card ending in {}", last4),
            None => "Credit/Debit Card".to_string(),
        }
    }
}

impl fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardDetails")
            .field("holder_name", &self.holder_name)
            .field("number", &self.last4().map(|l| format!("**** {}", l)))
            .field("expiry_month", &self.expiry_month)
            .field("expiry_year", &self.expiry_year)
            .field("cvv", &"***")
            .finish()
    }
}

fn parse_month(input: &str) -> Option<u32> {
    if !is_month(input) {
        return None;
    }
    input.parse::<u32>().ok()
}

/// Luhn checksum over a string of ASCII digits.
///
/// Returns false for empty input or any non-digit.
pub fn luhn_valid(digits: &str) -> bool {
    if digits.is_empty() {
        return false;
    }
    let mut sum = 0u32;
    for (i, c) in digits.chars().rev().enumerate() {
        let Some(mut digit) = c.to_digit(10) else {
            return false;
        };
        if i % 2 == 1 {
            digit *= 2;
            if digit > 9 {
                digit -= 9;
            }
        }
        sum += digit;
    }
    sum % 10 == 0
}

/// Format typed input into groups of four digits, e.g. `4111 1111 1111 1111`.
///
/// Non-digits are dropped and at most 16 digits are kept.
pub fn format_card_number(input: &str) -> String {
    let digits: Vec<char> = input.chars().filter(|c| c.is_ascii_digit()).take(16).collect();
    digits
        .chunks(4)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}
