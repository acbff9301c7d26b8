//! Cart and line item types.

use crate::cart::{AppliedCoupon, Coupon};
use crate::catalog::Product;
use crate::error::CommerceError;
use crate::ids::{CartId, LineItemId, ProductId, UserId};
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Maximum quantity allowed per line item.
pub const MAX_QUANTITY_PER_ITEM: i64 = 99;

/// A shopping cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: CartId,
    /// Owner once signed in; guest carts have none.
    pub user_id: Option<UserId>,
    pub items: Vec<LineItem>,
    /// At most one coupon per cart.
    pub coupon: Option<AppliedCoupon>,
    pub currency: Currency,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

impl Cart {
    /// Create an empty guest cart.
    pub fn new() -> Self {
        let now = current_timestamp();
        Self {
            id: CartId::generate(),
            user_id: None,
            items: Vec::new(),
            coupon: None,
            currency: Currency::INR,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a cart for a signed-in user.
    pub fn for_user(user_id: UserId) -> Self {
        let mut cart = Self::new();
        cart.user_id = Some(user_id);
        cart
    }

    /// Add a product to the cart.
    ///
    /// Returns an error if:
    /// - Quantity is not positive
    /// - The product is out of stock
    /// - The line would exceed MAX_QUANTITY_PER_ITEM
    pub fn add_item(&mut self, product: &Product, quantity: i64) -> Result<LineItemId, CommerceError> {
        if quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        if !product.is_available() {
            return Err(CommerceError::OutOfStock(product.name.clone()));
        }
        if product.price.currency != self.currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: product.price.currency.code().to_string(),
            });
        }

        if let Some(existing) = self.items.iter_mut().find(|i| i.product_id == product.id) {
            let new_quantity = existing
                .quantity
                .checked_add(quantity)
                .ok_or(CommerceError::Overflow)?;

            if new_quantity > MAX_QUANTITY_PER_ITEM {
                return Err(CommerceError::QuantityExceedsLimit(
                    new_quantity,
                    MAX_QUANTITY_PER_ITEM,
                ));
            }

            existing.quantity = new_quantity;
            existing.update_total()?;
            self.updated_at = current_timestamp();
            return Ok(existing.id.clone());
        }

        if quantity > MAX_QUANTITY_PER_ITEM {
            return Err(CommerceError::QuantityExceedsLimit(
                quantity,
                MAX_QUANTITY_PER_ITEM,
            ));
        }

        let item = LineItem::from_product(product, quantity)?;
        let id = item.id.clone();
        self.items.push(item);
        self.updated_at = current_timestamp();
        Ok(id)
    }

    /// Set the quantity for a product.
    ///
    /// A quantity of zero or less removes the line. Returns whether the cart
    /// held the product.
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<bool, CommerceError> {
        if quantity <= 0 {
            return Ok(self.remove_item(product_id));
        }

        if quantity > MAX_QUANTITY_PER_ITEM {
            return Err(CommerceError::QuantityExceedsLimit(
                quantity,
                MAX_QUANTITY_PER_ITEM,
            ));
        }

        if let Some(item) = self.items.iter_mut().find(|i| &i.product_id == product_id) {
            item.quantity = quantity;
            item.update_total()?;
            self.updated_at = current_timestamp();
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Remove a product's line from the cart.
    pub fn remove_item(&mut self, product_id: &ProductId) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| &i.product_id != product_id);
        let removed = self.items.len() < len_before;
        if removed {
            self.updated_at = current_timestamp();
        }
        removed
    }

    /// Clear all items and the coupon.
    pub fn clear(&mut self) {
        self.items.clear();
        self.coupon = None;
        self.updated_at = current_timestamp();
    }

    /// Attach a coupon, replacing any previous one.
    ///
    /// Fails when the coupon is inactive or the current subtotal is below
    /// its minimum order.
    pub fn apply_coupon(&mut self, coupon: Coupon) -> Result<&AppliedCoupon, CommerceError> {
        let subtotal = self.subtotal()?;
        coupon.check(&subtotal)?;
        self.updated_at = current_timestamp();
        Ok(self.coupon.insert(AppliedCoupon::from(coupon)))
    }

    /// Detach the coupon. Returns whether one was applied.
    pub fn remove_coupon(&mut self) -> bool {
        let removed = self.coupon.take().is_some();
        if removed {
            self.updated_at = current_timestamp();
        }
        removed
    }

    /// Sum of line totals.
    pub fn subtotal(&self) -> Result<Money, CommerceError> {
        Money::try_sum(self.items.iter().map(|i| &i.total_price), self.currency)
            .ok_or(CommerceError::Overflow)
    }

    /// Coupon discount at the current subtotal.
    pub fn discount(&self) -> Result<Money, CommerceError> {
        match &self.coupon {
            Some(applied) => applied.coupon.discount_for(&self.subtotal()?),
            None => Ok(Money::zero(self.currency)),
        }
    }

    /// Total item count (sum of quantities).
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Number of distinct products.
    pub fn unique_item_count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_in_cart(&self, product_id: &ProductId) -> bool {
        self.get_item(product_id).is_some()
    }

    /// Quantity held for a product, zero when absent.
    pub fn quantity_of(&self, product_id: &ProductId) -> i64 {
        self.get_item(product_id).map_or(0, |i| i.quantity)
    }

    pub fn get_item(&self, product_id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|i| &i.product_id == product_id)
    }

    /// Merge a guest cart into this one (e.g., when the user signs in).
    ///
    /// Quantities saturate at MAX_QUANTITY_PER_ITEM. The guest coupon is
    /// kept only if this cart has none.
    pub fn merge(&mut self, other: Cart) -> Result<(), CommerceError> {
        for item in other.items {
            if let Some(existing) = self
                .items
                .iter_mut()
                .find(|i| i.product_id == item.product_id)
            {
                existing.quantity = existing
                    .quantity
                    .saturating_add(item.quantity)
                    .min(MAX_QUANTITY_PER_ITEM);
                existing.update_total()?;
            } else {
                let mut item = item;
                if item.quantity > MAX_QUANTITY_PER_ITEM {
                    item.quantity = MAX_QUANTITY_PER_ITEM;
                    item.update_total()?;
                }
                self.items.push(item);
            }
        }
        if self.coupon.is_none() {
            self.coupon = other.coupon;
        }
        self.updated_at = current_timestamp();
        Ok(())
    }

    /// Assign the cart to a signed-in user.
    pub fn set_user(&mut self, user_id: UserId) {
        self.user_id = Some(user_id);
        self.updated_at = current_timestamp();
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

/// A line item in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: LineItemId,
    pub product_id: ProductId,
    /// Product name (denormalized for display).
    pub name: String,
    pub image: Option<String>,
    pub quantity: i64,
    pub unit_price: Money,
    /// unit_price * quantity
    pub total_price: Money,
}

impl LineItem {
    /// Create a line item for a product.
    pub fn from_product(product: &Product, quantity: i64) -> Result<Self, CommerceError> {
        let total_price = product
            .price
            .try_multiply(quantity)
            .ok_or(CommerceError::Overflow)?;
        Ok(Self {
            id: LineItemId::generate(),
            product_id: product.id.clone(),
            name: product.name.clone(),
            image: product.primary_image().map(str::to_string),
            quantity,
            unit_price: product.price,
            total_price,
        })
    }

    /// Recompute the total after a quantity change.
    pub fn update_total(&mut self) -> Result<(), CommerceError> {
        self.total_price = self
            .unit_price
            .try_multiply(self.quantity)
            .ok_or(CommerceError::Overflow)?;
        Ok(())
    }
}

/// Get current Unix timestamp.
fn current_timestamp() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
