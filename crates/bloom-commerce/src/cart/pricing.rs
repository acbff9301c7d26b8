//! Cart pricing calculations.

use crate::cart::Cart;
use crate::checkout::DeliveryOption;
use crate::error::CommerceError;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Complete pricing breakdown shown on the review page.
///
/// `final_amount = (subtotal - discount) + delivery_charge + payment_charge`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    /// Sum of line totals.
    pub subtotal: Money,
    /// Coupon discount.
    pub discount: Money,
    /// Charge of the chosen delivery tier.
    pub delivery_charge: Money,
    /// Surcharge of the chosen payment method (COD).
    pub payment_charge: Money,
    pub final_amount: Money,
}

impl PriceBreakdown {
    /// Price a cart.
    ///
    /// Delivery is free when no option is chosen or the cart is empty.
    pub fn calculate(
        cart: &Cart,
        delivery: Option<&DeliveryOption>,
        payment_charge: Money,
    ) -> Result<Self, CommerceError> {
        let currency = cart.currency;
        let subtotal = cart.subtotal()?;
        let discount = cart.discount()?;

        let delivery_charge = match delivery {
            Some(option) if !cart.is_empty() => option.price,
            _ => Money::zero(currency),
        };

        let final_amount = subtotal
            .try_subtract(&discount)
            .and_then(|m| m.try_add(&delivery_charge))
            .and_then(|m| m.try_add(&payment_charge))
            .ok_or_else(|| CommerceError::CurrencyMismatch {
                expected: currency.code().to_string(),
                got: "mixed".to_string(),
            })?;

        Ok(Self {
            subtotal,
            discount,
            delivery_charge,
            payment_charge,
            final_amount,
        })
    }

    /// Check if a coupon discount is applied.
    pub fn has_discount(&self) -> bool {
        self.discount.is_positive()
    }

    /// Whether delivery shows as "Free".
    pub fn is_free_delivery(&self) -> bool {
        self.delivery_charge.is_zero()
    }

    /// Display rows in the order the review page lists them. The discount
    /// row appears only with a discount and the payment row only with a
    /// surcharge.
    pub fn rows(&self, coupon_code: Option<&str>) -> Vec<(String, String)> {
        let mut rows = vec![("Subtotal".to_string(), self.subtotal.display())];
        if self.has_discount() {
            let label = match coupon_code {
                Some(code) => format!("Coupon Discount ({})", code),
                None => "Coupon Discount".to_string(),
            };
            rows.push((label, format!("-{}", self.discount.display())));
        }
        let delivery = if self.is_free_delivery() {
            "Free".to_string()
        } else {
            self.delivery_charge.display()
        };
        rows.push(("Delivery Charges".to_string(), delivery));
        if self.payment_charge.is_positive() {
            rows.push(("Payment Processing".to_string(), self.payment_charge.display()));
        }
        rows.push(("Total Amount".to_string(), self.final_amount.display()));
        rows
    }
}
