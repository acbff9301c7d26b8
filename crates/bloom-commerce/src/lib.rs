//! Flower shop domain types and logic for Bouquet Bar.
//!
//! This crate holds everything the storefront computes locally:
//!
//! - **Catalog**: Products and shop filters
//! - **Cart**: Line items, coupons, price breakdown
//! - **Checkout**: Addresses, delivery tiers, the four-step wizard, orders, tracking
//! - **Payment**: Simulated card / UPI / net banking / COD / QR code validation
//!
//! # Example
//!
//! ```rust
//! use bloom_commerce::prelude::*;
//!
//! let rose = Product::new("rose-12", "Red Rose Bouquet", Money::inr(1299));
//!
//! let mut cart = Cart::new();
//! cart.add_item(&rose, 2).unwrap();
//! cart.apply_coupon(Coupon::first_bloom()).unwrap();
//!
//! let express = DeliveryOption::express();
//! let pricing = PriceBreakdown::calculate(&cart, Some(&express), Money::inr(0)).unwrap();
//! assert_eq!(pricing.final_amount.display(), "₹2,277.4");
//! ```

pub mod error;
pub mod ids;
pub mod money;
pub mod validate;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod payment;

pub use error::{CommerceError, FieldErrors};
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{CommerceError, FieldErrors};
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{FlowerCategory, Product, ProductFilter};

    // Cart
    pub use crate::cart::{
        AppliedCoupon, Cart, Coupon, CouponKind, LineItem, PriceBreakdown, MAX_QUANTITY_PER_ITEM,
    };

    // Checkout
    pub use crate::checkout::{
        Address, AddressBook, AddressForm, AddressType, CheckoutFlow, CheckoutStep, Customer,
        DeliveryOption, OrderRequest, OrderStatus, PlacedOrder, Readiness, ReviewConsent,
        TrackingData,
    };

    // Payment
    pub use crate::payment::{
        CardDetails, CodDetails, NetBankingDetails, PaymentContext, PaymentData, PaymentDetails,
        PaymentError, PaymentMethod, QrCodeDetails, UpiDetails, UpiPayee,
    };
}
