//! Money type for representing monetary values.
//!
//! Amounts are held as integers in the smallest currency unit (paise for INR)
//! so that cart totals never accumulate floating-point error.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    INR,
    USD,
    EUR,
    GBP,
    AED,
}

impl Currency {
    /// Get the currency code (e.g., "INR").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::INR => "INR",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::AED => "AED",
        }
    }

    /// Get the currency symbol (e.g., "₹").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::INR => "\u{20b9}",
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
            Currency::GBP => "\u{00a3}",
            Currency::AED => "AED ",
        }
    }

    /// Number of decimal places in the minor unit.
    pub fn decimal_places(&self) -> u32 {
        2
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "INR" => Some(Currency::INR),
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            "AED" => Some(Currency::AED),
            _ => None,
        }
    }

    /// Whether amounts are grouped the Indian way (1,23,45,678).
    fn uses_indian_grouping(&self) -> bool {
        matches!(self, Currency::INR)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary value with currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in the smallest currency unit (paise, cents).
    pub amount_cents: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value from minor units.
    pub fn new(amount_cents: i64, currency: Currency) -> Self {
        Self {
            amount_cents,
            currency,
        }
    }

    /// Create a Money value from whole major units (rupees).
    pub fn from_major(amount: i64, currency: Currency) -> Self {
        Self::new(amount * 10_i64.pow(currency.decimal_places()), currency)
    }

    /// Shorthand for an INR amount in whole rupees.
    pub fn inr(rupees: i64) -> Self {
        Self::from_major(rupees, Currency::INR)
    }

    /// Parse a decimal string such as `"499.00"` or `"1250"`.
    ///
    /// The API serializes prices as strings; parsing them as integers keeps
    /// the amount exact. Returns `None` for malformed input or more
    /// fractional digits than the currency allows.
    ///
    /// ```
    /// use bloom_commerce::money::{Money, Currency};
    /// let price = Money::parse_decimal("499.50", Currency::INR).unwrap();
    /// assert_eq!(price.amount_cents, 49950);
    /// ```
    pub fn parse_decimal(input: &str, currency: Currency) -> Option<Self> {
        let input = input.trim();
        let (negative, digits) = match input.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, input),
        };
        let (whole, frac) = match digits.split_once('.') {
            Some((w, f)) => (w, f),
            None => (digits, ""),
        };
        let places = currency.decimal_places() as usize;
        if whole.is_empty() && frac.is_empty() {
            return None;
        }
        if frac.len() > places
            || !whole.chars().all(|c| c.is_ascii_digit())
            || !frac.chars().all(|c| c.is_ascii_digit())
        {
            return None;
        }

        let whole_value: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
        let mut frac_value: i64 = if frac.is_empty() { 0 } else { frac.parse().ok()? };
        for _ in frac.len()..places {
            frac_value *= 10;
        }

        let amount = whole_value
            .checked_mul(10_i64.pow(places as u32))?
            .checked_add(frac_value)?;
        Some(Self::new(if negative { -amount } else { amount }, currency))
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    pub fn is_zero(&self) -> bool {
        self.amount_cents == 0
    }

    pub fn is_positive(&self) -> bool {
        self.amount_cents > 0
    }

    pub fn is_negative(&self) -> bool {
        self.amount_cents < 0
    }

    /// Format as a plain decimal string with full precision (e.g., "499.00").
    ///
    /// This is the form the order API expects.
    pub fn to_decimal_string(&self) -> String {
        let divisor = 10_i64.pow(self.currency.decimal_places());
        let sign = if self.amount_cents < 0 { "-" } else { "" };
        let abs = self.amount_cents.unsigned_abs();
        format!(
            "{}{}.{:0width$}",
            sign,
            abs / divisor as u64,
            abs % divisor as u64,
            width = self.currency.decimal_places() as usize
        )
    }

    /// Format for display, e.g. `₹1,23,456.5`, `₹1,23,456.05` or `₹499`.
    ///
    /// Trailing zeros of the fractional part are dropped, as in the
    /// storefront's price labels.
    pub fn display(&self) -> String {
        format!("{}{}", self.currency.symbol(), self.display_amount())
    }

    /// Format for display without the symbol (e.g., "1,23,456.5").
    pub fn display_amount(&self) -> String {
        let divisor = 10_u64.pow(self.currency.decimal_places());
        let abs = self.amount_cents.unsigned_abs();
        let whole = group_digits(abs / divisor, self.currency.uses_indian_grouping());
        let frac = abs % divisor;
        let sign = if self.amount_cents < 0 { "-" } else { "" };
        if frac == 0 {
            return format!("{}{}", sign, whole);
        }
        let digits = format!(
            "{:0width$}",
            frac,
            width = self.currency.decimal_places() as usize
        );
        format!("{}{}.{}", sign, whole, digits.trim_end_matches('0'))
    }

    /// Try to add another Money value, returning None on currency mismatch or overflow.
    pub fn try_add(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        Some(Money::new(
            self.amount_cents.checked_add(other.amount_cents)?,
            self.currency,
        ))
    }

    /// Try to subtract another Money value.
    pub fn try_subtract(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        Some(Money::new(
            self.amount_cents.checked_sub(other.amount_cents)?,
            self.currency,
        ))
    }

    /// Multiply by a scalar, returning None on overflow.
    pub fn try_multiply(&self, factor: i64) -> Option<Money> {
        Some(Money::new(self.amount_cents.checked_mul(factor)?, self.currency))
    }

    /// Take a percentage expressed in basis points (2000 = 20%).
    ///
    /// Rounds half up to the nearest minor unit.
    pub fn percentage_bps(&self, basis_points: u32) -> Option<Money> {
        let scaled = (self.amount_cents as i128).checked_mul(basis_points as i128)?;
        let rounded = (scaled + 5_000) / 10_000;
        Some(Money::new(i64::try_from(rounded).ok()?, self.currency))
    }

    /// The smaller of two amounts of the same currency.
    pub fn min(self, other: Money) -> Money {
        if other.amount_cents < self.amount_cents {
            other
        } else {
            self
        }
    }

    /// Sum an iterator of Money values, returning None on mismatch or overflow.
    pub fn try_sum<'a>(
        mut iter: impl Iterator<Item = &'a Money>,
        currency: Currency,
    ) -> Option<Money> {
        iter.try_fold(Money::zero(currency), |acc, m| acc.try_add(m))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Insert thousands separators. Indian grouping keeps the last three digits
/// together and groups the rest in pairs.
fn group_digits(value: u64, indian: bool) -> String {
    let digits = value.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let group = if indian { 2 } else { 3 };
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(group);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}
