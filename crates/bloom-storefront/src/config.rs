//! Store configuration.

use bloom_commerce::cart::Coupon;
use bloom_commerce::checkout::{find_delivery_option, DeliveryOption};
use bloom_commerce::payment::UpiPayee;
use bloom_commerce::{Currency, DeliveryOptionId, Money};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Settings for one storefront.
///
/// Every field has a default, so an empty file is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Shop name shown in receipts and the UPI link.
    pub store_name: String,
    pub currency: Currency,
    /// Base URL of the backend REST API.
    pub api_base_url: String,
    /// Base URL of the reverse geocoder.
    pub geocoder_url: String,
    /// Push cart changes to `/api/cart` for signed-in users.
    pub sync_cart: bool,
    /// Surcharge for cash on delivery.
    pub cod_fee: Money,
    pub upi_payee: UpiPayee,
    pub delivery_options: Vec<DeliveryOption>,
    pub coupons: Vec<Coupon>,
}

fn default_store_name() -> String {
    "Bouquet Bar".to_string()
}

fn default_api_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_geocoder_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_cod_fee() -> Money {
    Money::inr(50)
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            store_name: default_store_name(),
            currency: Currency::INR,
            api_base_url: default_api_base_url(),
            geocoder_url: default_geocoder_url(),
            sync_cart: true,
            cod_fee: default_cod_fee(),
            upi_payee: UpiPayee::default(),
            delivery_options: DeliveryOption::defaults(),
            coupons: vec![Coupon::first_bloom()],
        }
    }
}

impl StoreConfig {
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_geocoder_url(mut self, url: impl Into<String>) -> Self {
        self.geocoder_url = url.into();
        self
    }

    pub fn with_cart_sync(mut self, enabled: bool) -> Self {
        self.sync_cart = enabled;
        self
    }

    pub fn with_coupon(mut self, coupon: Coupon) -> Self {
        self.coupons.push(coupon);
        self
    }

    /// Look up a delivery tier offered by this store.
    pub fn delivery_option(&self, id: &DeliveryOptionId) -> Option<&DeliveryOption> {
        find_delivery_option(&self.delivery_options, id)
    }

    /// Problems that would make the store misbehave. Empty when valid.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.store_name.trim().is_empty() {
            problems.push("store_name must not be empty".to_string());
        }
        for (field, url) in [
            ("api_base_url", &self.api_base_url),
            ("geocoder_url", &self.geocoder_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                problems.push(format!("{} must be an http(s) URL, got '{}'", field, url));
            }
        }

        if self.cod_fee.is_negative() {
            problems.push("cod_fee must not be negative".to_string());
        }
        if self.cod_fee.currency != self.currency {
            problems.push(format!(
                "cod_fee is in {} but the store sells in {}",
                self.cod_fee.currency, self.currency
            ));
        }

        if self.delivery_options.is_empty() {
            problems.push("at least one delivery option is required".to_string());
        }
        let mut seen = HashSet::new();
        for option in &self.delivery_options {
            if !seen.insert(option.id.as_str()) {
                problems.push(format!("duplicate delivery option id '{}'", option.id));
            }
            if option.price.is_negative() {
                problems.push(format!("delivery option '{}' has a negative price", option.id));
            }
            if option.price.currency != self.currency {
                problems.push(format!(
                    "delivery option '{}' is priced in {}",
                    option.id, option.price.currency
                ));
            }
        }

        let mut codes = HashSet::new();
        for coupon in &self.coupons {
            if coupon.code.trim().is_empty() {
                problems.push("coupon with an empty code".to_string());
            } else if !codes.insert(coupon.code.as_str()) {
                problems.push(format!("duplicate coupon code '{}'", coupon.code));
            }
        }

        problems
    }
}
