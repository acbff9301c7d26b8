//! Shopping cart module.
//!
//! Contains types for cart, line items, coupons, and pricing.

mod cart;
mod coupon;
mod pricing;

pub use cart::{Cart, LineItem, MAX_QUANTITY_PER_ITEM};
pub use coupon::{find_coupon, normalize_code, AppliedCoupon, Coupon, CouponKind, FIRST_ORDER_CODE};
pub use pricing::PriceBreakdown;
