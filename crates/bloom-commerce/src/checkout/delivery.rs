//! Delivery tiers.

use crate::ids::DeliveryOptionId;
use crate::money::Money;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// A named delivery tier with price and estimated days.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryOption {
    pub id: DeliveryOptionId,
    pub name: String,
    pub price: Money,
    /// Minimum and maximum days until delivery. `(0, 0)` is same day.
    pub estimated_days: (u32, u32),
    #[serde(default)]
    pub description: String,
}

impl DeliveryOption {
    pub fn new(id: &str, name: impl Into<String>, price: Money, min_days: u32, max_days: u32) -> Self {
        Self {
            id: DeliveryOptionId::new(id),
            name: name.into(),
            price,
            estimated_days: (min_days.min(max_days), max_days.max(min_days)),
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn standard() -> Self {
        Self::new("standard", "Standard Delivery", Money::inr(99), 3, 5)
            .with_description("Delivered within 3-5 business days")
    }

    pub fn express() -> Self {
        Self::new("express", "Express Delivery", Money::inr(199), 1, 2)
            .with_description("Delivered within 1-2 business days")
    }

    pub fn same_day() -> Self {
        Self::new("same-day", "Same Day Delivery", Money::inr(299), 0, 0)
            .with_description("Delivered today within Bengaluru")
    }

    /// The tiers offered when the store is not configured otherwise.
    pub fn defaults() -> Vec<Self> {
        vec![Self::standard(), Self::express(), Self::same_day()]
    }

    /// Estimate label, e.g. "3-5", "1-2" or "0" for same day.
    pub fn estimate_label(&self) -> String {
        match self.estimated_days {
            (min, max) if min == max => min.to_string(),
            (min, max) => format!("{}-{}", min, max),
        }
    }

    /// Latest expected delivery date for an order placed on `order_date`.
    pub fn estimated_delivery_date(&self, order_date: NaiveDate) -> NaiveDate {
        order_date
            .checked_add_days(Days::new(u64::from(self.estimated_days.1)))
            .unwrap_or(order_date)
    }

    pub fn is_free(&self) -> bool {
        self.price.is_zero()
    }
}

/// Find a tier by id.
pub fn find_delivery_option<'a>(
    options: &'a [DeliveryOption],
    id: &DeliveryOptionId,
) -> Option<&'a DeliveryOption> {
    options.iter().find(|o| &o.id == id)
}
