//! Field format checks shared by the address, payment and account forms.
//!
//! Inputs are matched as typed. Callers that accept padded input trim it
//! before calling.

use regex::Regex;
use std::sync::OnceLock;

/// Compile `source` into `cell` on first use.
///
/// Only the literals below are compiled here; the tests exercise each one.
fn compiled(cell: &'static OnceLock<Regex>, source: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(source).unwrap_or_else(|e| panic!("bad pattern {source}: {e}")))
}

macro_rules! matcher {
    ($(#[$doc:meta])* $vis:vis $name:ident, $re:literal) => {
        $(#[$doc])*
        $vis fn $name(input: &str) -> bool {
            static RE: OnceLock<Regex> = OnceLock::new();
            compiled(&RE, $re).is_match(input)
        }
    };
}

matcher!(
    /// Indian mobile number: optional `+91` or `0` prefix, then ten digits
    /// starting with 6-9.
    pub is_indian_mobile,
    r"^(\+91|0)?[6-9][0-9]{9}$"
);

matcher!(
    /// Six-digit PIN code not starting with zero.
    pub is_indian_pin_code,
    r"^[1-9][0-9]{5}$"
);

matcher!(
    /// `handle@provider`: the handle is 2-256 of `[A-Za-z0-9._-]`, the
    /// provider 2-64 ASCII letters.
    pub is_valid_upi_id,
    r"^[a-zA-Z0-9.\-_]{2,256}@[a-zA-Z]{2,64}$"
);

matcher!(
    /// Letters and whitespace only, at least one character.
    pub is_letters_and_spaces,
    r"^[a-zA-Z\s]+$"
);

matcher!(
    /// Two-digit month `01`-`12`.
    pub is_month,
    r"^(0[1-9]|1[0-2])$"
);

matcher!(email_shape, r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$");

/// `local@domain.tld`. The local part may not start with a dot or contain
/// `..`; every domain label starts with a letter or digit and the TLD has at
/// least two letters.
pub fn is_valid_email(input: &str) -> bool {
    !input.starts_with('.') && !input.contains("..") && email_shape(input)
}

/// Length in characters.
pub fn char_len(input: &str) -> usize {
    input.chars().count()
}

/// All ASCII digits, with an exact length.
pub fn is_digits(input: &str, len: usize) -> bool {
    input.len() == len && input.chars().all(|c| c.is_ascii_digit())
}
