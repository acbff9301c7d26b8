//! Checkout module.
//!
//! Contains the checkout wizard, addresses, delivery tiers, orders and
//! tracking.

mod address;
mod delivery;
mod flow;
mod order;
mod tracking;

pub use address::{Address, AddressBook, AddressForm, AddressType, DEFAULT_COUNTRY};
pub use delivery::{find_delivery_option, DeliveryOption};
pub use flow::{
    can_place_order, validation_errors, CheckoutFlow, CheckoutStep, Readiness, ReviewConsent,
    StepStatus,
};
pub use order::{Customer, OrderItem, OrderRequest, OrderStatus, OrderSummary, PlacedOrder};
pub use tracking::{
    format_date, format_date_time, parse_timestamp, HistoryLine, ProgressStep, StatusHistoryEntry,
    StepState, TimelineStep, TrackedOrder, TrackingData, TrackingView,
};
