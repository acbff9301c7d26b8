//! Orders: status, the placement payload and the server's reply.

use crate::cart::{Cart, LineItem, PriceBreakdown};
use crate::checkout::{Address, DeliveryOption};
use crate::error::CommerceError;
use crate::ids::{AddressId, DeliveryOptionId, OrderId, ProductId, UserId};
use crate::money::Money;
use crate::payment::{PaymentDetails, PaymentMethod};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Placed, awaiting confirmation.
    #[default]
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// The forward path an order travels, excluding cancellation.
    pub const PROGRESSION: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(OrderStatus::Pending),
            "confirmed" => Some(OrderStatus::Confirmed),
            "processing" => Some(OrderStatus::Processing),
            "shipped" => Some(OrderStatus::Shipped),
            "delivered" => Some(OrderStatus::Delivered),
            "cancelled" | "canceled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Whether the order has reached a final state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Customers may cancel until the order ships.
    pub fn is_cancellable(&self) -> bool {
        matches!(
            self,
            OrderStatus::Pending | OrderStatus::Confirmed | OrderStatus::Processing
        )
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::from_str(s).ok_or_else(|| CommerceError::UnknownOrderStatus(s.to_string()))
    }
}

/// One item in the order payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    pub quantity: i64,
    /// Unit price, decimal string.
    pub price: String,
    /// Line total, decimal string.
    pub total: String,
}

impl From<&LineItem> for OrderItem {
    fn from(item: &LineItem) -> Self {
        Self {
            product_id: item.product_id.clone(),
            name: item.name.clone(),
            image: item.image.clone(),
            quantity: item.quantity,
            price: item.unit_price.to_decimal_string(),
            total: item.total_price.to_decimal_string(),
        }
    }
}

/// Who the order is for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub user_id: Option<UserId>,
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl Customer {
    /// Contact details taken from the shipping address, with the account
    /// email as fallback.
    pub fn from_address(address: &Address, user_id: Option<UserId>, account_email: Option<&str>) -> Self {
        Self {
            user_id,
            name: address.full_name.clone(),
            email: address
                .email
                .clone()
                .or_else(|| account_email.map(str::to_string))
                .unwrap_or_default(),
            phone: address.phone.clone(),
        }
    }
}

/// Body posted to `/api/orders`.
///
/// Amounts are decimal strings; payment details are masked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub customer_name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    pub items: Vec<OrderItem>,
    pub subtotal: String,
    pub delivery_charge: String,
    pub discount_amount: String,
    pub payment_charges: String,
    pub total: String,
    pub payment_method: PaymentMethod,
    pub payment_details: String,
    pub delivery_address: String,
    pub shipping_address_id: AddressId,
    pub delivery_option_id: DeliveryOptionId,
    /// `YYYY-MM-DD`
    pub estimated_delivery_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,
}

impl OrderRequest {
    /// Assemble the payload from validated checkout state.
    pub fn build(
        cart: &Cart,
        pricing: &PriceBreakdown,
        customer: Customer,
        address: &Address,
        delivery: &DeliveryOption,
        payment: &PaymentDetails,
        order_date: NaiveDate,
    ) -> Result<Self, CommerceError> {
        if cart.is_empty() {
            return Err(CommerceError::CheckoutIncomplete(vec![
                "Cart is empty".to_string(),
            ]));
        }

        Ok(Self {
            customer_name: customer.name,
            email: customer.email,
            phone: customer.phone,
            user_id: customer.user_id,
            items: cart.items.iter().map(OrderItem::from).collect(),
            subtotal: pricing.subtotal.to_decimal_string(),
            delivery_charge: pricing.delivery_charge.to_decimal_string(),
            discount_amount: pricing.discount.to_decimal_string(),
            payment_charges: pricing.payment_charge.to_decimal_string(),
            total: pricing.final_amount.to_decimal_string(),
            payment_method: payment.method(),
            payment_details: payment.masked_summary(),
            delivery_address: address.formatted(),
            shipping_address_id: address.id.clone(),
            delivery_option_id: delivery.id.clone(),
            estimated_delivery_date: delivery
                .estimated_delivery_date(order_date)
                .format("%Y-%m-%d")
                .to_string(),
            coupon_code: cart.coupon.as_ref().map(|c| c.code.clone()),
        })
    }
}

/// The server's reply to a successful placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedOrder {
    pub id: OrderId,
    #[serde(alias = "ordernumber", alias = "order_number")]
    pub order_number: String,
}

/// An order as listed under the customer's account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: OrderId,
    #[serde(alias = "ordernumber")]
    pub order_number: String,
    pub status: OrderStatus,
    /// Decimal string as served.
    pub total: String,
    pub created_at: String,
    #[serde(default)]
    pub estimated_delivery_date: Option<String>,
}

impl OrderSummary {
    pub fn total_money(&self) -> Option<Money> {
        Money::parse_decimal(&self.total, crate::money::Currency::INR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Product;
    use crate::checkout::AddressForm;
    use crate::payment::{UpiDetails, PaymentDetails};

    fn address() -> Address {
        AddressForm {
            full_name: "Priya Sharma".to_string(),
            phone: "9876543210".to_string(),
            address_line1: "12 MG Road".to_string(),
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            postal_code: "560001".to_string(),
            ..AddressForm::default()
        }
        .into_address(AddressId::new("addr-1"), None)
        .unwrap()
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!(OrderStatus::from_str("Shipped"), Some(OrderStatus::Shipped));
        assert_eq!(OrderStatus::from_str("canceled"), Some(OrderStatus::Cancelled));
        assert!("lost".parse::<OrderStatus>().is_err());
        assert!(OrderStatus::Processing.is_cancellable());
        assert!(!OrderStatus::Shipped.is_cancellable());
    }

    #[test]
    fn test_build_request() {
        let mut cart = Cart::new();
        cart.add_item(&Product::new("p1", "Rose Box", Money::inr(1000)), 2)
            .unwrap();
        cart.apply_coupon(crate::cart::Coupon::first_bloom()).unwrap();
        let delivery = DeliveryOption::standard();
        let pricing = PriceBreakdown::calculate(&cart, Some(&delivery), Money::inr(0)).unwrap();
        let address = address();
        let customer = Customer::from_address(&address, Some(UserId::new("u1")), Some("priya@example.com"));
        let payment = PaymentDetails::Upi(UpiDetails::new("priya@okicici"));
        let date = NaiveDate::from_ymd_opt(2025, 2, 10).unwrap();

        let request =
            OrderRequest::build(&cart, &pricing, customer, &address, &delivery, &payment, date)
                .unwrap();

        assert_eq!(request.email, "priya@example.com");
        assert_eq!(request.subtotal, "2000.00");
        assert_eq!(request.discount_amount, "400.00");
        assert_eq!(request.delivery_charge, "99.00");
        assert_eq!(request.total, "1699.00");
        assert_eq!(request.payment_details, "pr***@okicici");
        assert_eq!(request.estimated_delivery_date, "2025-02-15");
        assert_eq!(request.coupon_code.as_deref(), Some("FIRSTBLOOM"));

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["paymentMethod"], "upi");
        assert_eq!(json["items"][0]["quantity"], 2);
        assert_eq!(json["userId"], "u1");
    }

    #[test]
    fn test_build_rejects_empty_cart() {
        let cart = Cart::new();
        let delivery = DeliveryOption::standard();
        let pricing = PriceBreakdown::calculate(&cart, Some(&delivery), Money::inr(0)).unwrap();
        let address = address();
        let result = OrderRequest::build(
            &cart,
            &pricing,
            Customer::from_address(&address, None, None),
            &address,
            &delivery,
            &PaymentDetails::Upi(UpiDetails::new("priya@okicici")),
            NaiveDate::from_ymd_opt(2025, 2, 10).unwrap(),
        );
        assert!(matches!(result, Err(CommerceError::CheckoutIncomplete(_))));
    }

    #[test]
    fn test_placed_order_accepts_lowercase_key() {
        let placed: PlacedOrder =
            serde_json::from_str(r#"{"id":"42","ordernumber":"BB-0042"}"#).unwrap();
        assert_eq!(placed.order_number, "BB-0042");
    }
}
