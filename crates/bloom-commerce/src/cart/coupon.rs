//! Coupon codes.

use crate::error::CommerceError;
use crate::ids::CouponId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Code of the first-order promotion.
pub const FIRST_ORDER_CODE: &str = "FIRSTBLOOM";

/// How a coupon reduces the subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum CouponKind {
    /// Percentage off in basis points (2000 = 20%).
    Percentage(u32),
    /// Fixed amount off.
    Fixed(Money),
}

/// A coupon definition.
///
/// The id is derived from the code unless one is given, so the same
/// definition always carries the same id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "CouponRecord")]
pub struct Coupon {
    pub id: CouponId,
    /// Stored uppercase.
    pub code: String,
    pub description: String,
    pub kind: CouponKind,
    /// Subtotal required before the coupon applies.
    #[serde(default)]
    pub min_order: Option<Money>,
    /// Upper bound on the discount for percentage coupons.
    #[serde(default)]
    pub max_discount: Option<Money>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// A coupon as written in config, with the id optional.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CouponRecord {
    #[serde(default)]
    id: Option<CouponId>,
    code: String,
    description: String,
    kind: CouponKind,
    #[serde(default)]
    min_order: Option<Money>,
    #[serde(default)]
    max_discount: Option<Money>,
    #[serde(default = "default_active")]
    active: bool,
}

impl From<CouponRecord> for Coupon {
    fn from(record: CouponRecord) -> Self {
        let code = normalize_code(&record.code);
        Self {
            id: record.id.unwrap_or_else(|| coupon_id(&code)),
            code,
            description: record.description,
            kind: record.kind,
            min_order: record.min_order,
            max_discount: record.max_discount,
            active: record.active,
        }
    }
}

/// Stable id for a normalized code.
fn coupon_id(code: &str) -> CouponId {
    CouponId::new(code.to_lowercase())
}

impl Coupon {
    /// Create a percentage coupon.
    pub fn percentage(code: &str, description: impl Into<String>, basis_points: u32) -> Self {
        let code = normalize_code(code);
        Self {
            id: coupon_id(&code),
            code,
            description: description.into(),
            kind: CouponKind::Percentage(basis_points.min(10_000)),
            min_order: None,
            max_discount: None,
            active: true,
        }
    }

    /// Create a fixed amount coupon.
    pub fn fixed(code: &str, description: impl Into<String>, amount: Money) -> Self {
        let code = normalize_code(code);
        Self {
            id: coupon_id(&code),
            code,
            description: description.into(),
            kind: CouponKind::Fixed(amount),
            min_order: None,
            max_discount: None,
            active: true,
        }
    }

    /// The built-in `FIRSTBLOOM` promotion: 20% off.
    pub fn first_bloom() -> Self {
        Self::percentage(FIRST_ORDER_CODE, "20% OFF on First Order!", 2_000)
    }

    pub fn with_min_order(mut self, amount: Money) -> Self {
        self.min_order = Some(amount);
        self
    }

    pub fn with_max_discount(mut self, amount: Money) -> Self {
        self.max_discount = Some(amount);
        self
    }

    pub fn deactivate(mut self) -> Self {
        self.active = false;
        self
    }

    /// Compare against user input, ignoring case and surrounding whitespace.
    pub fn matches_code(&self, input: &str) -> bool {
        self.code == normalize_code(input)
    }

    /// Whether the subtotal meets the coupon's minimum.
    pub fn is_eligible(&self, subtotal: &Money) -> bool {
        self.active
            && self
                .min_order
                .map_or(true, |min| subtotal.amount_cents >= min.amount_cents)
    }

    /// Check the coupon can be applied to a cart with this subtotal.
    pub fn check(&self, subtotal: &Money) -> Result<(), CommerceError> {
        if !self.active {
            return Err(CommerceError::CouponInactive(self.code.clone()));
        }
        if let Some(min) = self.min_order {
            if subtotal.amount_cents < min.amount_cents {
                return Err(CommerceError::CouponMinimumNotMet {
                    code: self.code.clone(),
                    minimum: min.display(),
                });
            }
        }
        Ok(())
    }

    /// Discount for a subtotal. Never negative and never above the subtotal;
    /// zero when the coupon is not eligible.
    pub fn discount_for(&self, subtotal: &Money) -> Result<Money, CommerceError> {
        let zero = Money::zero(subtotal.currency);
        if !self.is_eligible(subtotal) || !subtotal.is_positive() {
            return Ok(zero);
        }

        let raw = match self.kind {
            CouponKind::Percentage(bps) => subtotal
                .percentage_bps(bps)
                .ok_or(CommerceError::Overflow)?,
            CouponKind::Fixed(amount) => {
                if amount.currency != subtotal.currency {
                    return Err(CommerceError::CurrencyMismatch {
                        expected: subtotal.currency.code().to_string(),
                        got: amount.currency.code().to_string(),
                    });
                }
                amount
            }
        };

        let mut discount = raw.min(*subtotal);
        if let Some(cap) = self.max_discount {
            discount = discount.min(cap);
        }
        if discount.is_negative() {
            discount = zero;
        }
        Ok(discount)
    }
}

/// A coupon attached to a cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedCoupon {
    pub code: String,
    pub description: String,
    pub coupon: Coupon,
}

impl From<Coupon> for AppliedCoupon {
    fn from(coupon: Coupon) -> Self {
        Self {
            code: coupon.code.clone(),
            description: coupon.description.clone(),
            coupon,
        }
    }
}

/// Look up a coupon by user-entered code.
pub fn find_coupon<'a>(coupons: &'a [Coupon], input: &str) -> Result<&'a Coupon, CommerceError> {
    let code = normalize_code(input);
    if code.is_empty() {
        return Err(CommerceError::InvalidCouponCode(input.to_string()));
    }
    coupons
        .iter()
        .find(|c| c.code == code)
        .ok_or(CommerceError::InvalidCouponCode(code))
}

/// Uppercase and trim a coupon code.
pub fn normalize_code(input: &str) -> String {
    input.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_bloom() {
        let coupon = Coupon::first_bloom();
        assert_eq!(coupon.code, "FIRSTBLOOM");
        assert_eq!(coupon.description, "20% OFF on First Order!");
        assert_eq!(
            coupon.discount_for(&Money::inr(1000)).unwrap(),
            Money::inr(200)
        );
        assert_eq!(coupon.id, CouponId::new("firstbloom"));
        assert_eq!(Coupon::first_bloom(), coupon);
    }

    #[test]
    fn test_config_coupon_id_defaults_to_code() {
        let coupon: Coupon = serde_json::from_str(
            r#"{"code":" monsoon ","description":"Rain sale","kind":{"type":"percentage","value":1000}}"#,
        )
        .unwrap();
        assert_eq!(coupon.code, "MONSOON");
        assert_eq!(coupon.id.as_str(), "monsoon");
        assert!(coupon.active);

        let named: Coupon = serde_json::from_str(
            r#"{"id":"cpn-7","code":"FLAT50","description":"","kind":{"type":"fixed","value":{"amount_cents":5000,"currency":"INR"}}}"#,
        )
        .unwrap();
        assert_eq!(named.id.as_str(), "cpn-7");

        let back: Coupon = serde_json::from_str(&serde_json::to_string(&coupon).unwrap()).unwrap();
        assert_eq!(back, coupon);
    }

    #[test]
    fn test_code_matching_is_case_insensitive() {
        let coupons = vec![Coupon::first_bloom()];
        assert!(find_coupon(&coupons, "  firstBloom ").is_ok());
        assert!(matches!(
            find_coupon(&coupons, "NOPE"),
            Err(CommerceError::InvalidCouponCode(_))
        ));
        assert!(find_coupon(&coupons, "   ").is_err());
    }

    #[test]
    fn test_fixed_never_exceeds_subtotal() {
        let coupon = Coupon::fixed("FLAT500", "Flat 500 off", Money::inr(500));
        assert_eq!(
            coupon.discount_for(&Money::inr(300)).unwrap(),
            Money::inr(300)
        );
    }

    #[test]
    fn test_max_discount_caps_percentage() {
        let coupon = Coupon::percentage("BIG", "50% off", 5_000).with_max_discount(Money::inr(400));
        assert_eq!(
            coupon.discount_for(&Money::inr(2000)).unwrap(),
            Money::inr(400)
        );
    }

    #[test]
    fn test_min_order() {
        let coupon = Coupon::fixed("SPEND1K", "100 off", Money::inr(100)).with_min_order(Money::inr(1000));
        assert!(matches!(
            coupon.check(&Money::inr(999)),
            Err(CommerceError::CouponMinimumNotMet { .. })
        ));
        assert!(coupon.check(&Money::inr(1000)).is_ok());
        assert!(coupon.discount_for(&Money::inr(999)).unwrap().is_zero());
    }

    #[test]
    fn test_inactive_coupon() {
        let coupon = Coupon::first_bloom().deactivate();
        assert!(matches!(
            coupon.check(&Money::inr(1000)),
            Err(CommerceError::CouponInactive(_))
        ));
    }
}
