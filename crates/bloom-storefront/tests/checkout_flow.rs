//! End-to-end checkout against an in-memory API.

use bloom_auth::SignInForm;
use bloom_cache::{Cache, SessionId};
use bloom_commerce::prelude::*;
use bloom_data::{MemoryTransport, Method};
use bloom_storefront::{StoreConfig, StorefrontApi, StorefrontError, StorefrontSession};
use chrono::NaiveDate;
use serde_json::{json, Value};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
}

fn api(transport: &MemoryTransport) -> StorefrontApi<MemoryTransport> {
    StorefrontApi::new(transport.clone(), "http://localhost:5000")
}

fn stub_server(transport: &MemoryTransport) {
    transport
        .respond_json(
            Method::Post,
            "/api/auth/signin",
            200,
            &json!({
                "user": {"id": "u42", "email": "ananya@example.com", "firstname": "Ananya"},
                "token": "tok-42"
            }),
        )
        .unwrap();
    transport
        .respond_json(Method::Get, "/api/cart", 200, &json!({"items": []}))
        .unwrap();
    transport
        .respond_json(Method::Put, "/api/cart", 200, &json!({"ok": true}))
        .unwrap();
    transport
        .respond_json(
            Method::Post,
            "/api/orders",
            201,
            &json!({"order": {"id": "ord_1", "ordernumber": "BB-1001"}}),
        )
        .unwrap();
    transport
        .respond_json(
            Method::Get,
            "/api/orders/ord_1/tracking",
            200,
            &json!({
                "order": {
                    "id": "ord_1",
                    "orderNumber": "BB-1001",
                    "status": "confirmed",
                    "total": "2177.40",
                    "createdAt": "2025-06-15T10:00:00Z",
                    "estimatedDeliveryDate": "2025-06-17"
                },
                "statusHistory": [
                    {"id": "h1", "orderId": "ord_1", "status": "pending", "createdAt": "2025-06-15T10:00:00Z"},
                    {"id": "h2", "orderId": "ord_1", "status": "confirmed", "createdAt": "2025-06-15T10:05:00Z"}
                ],
                "progressSteps": [
                    {"step": "Order Placed", "status": "pending", "completed": true},
                    {"step": "Confirmed", "status": "confirmed", "completed": false},
                    {"step": "Shipped", "status": "shipped", "completed": false}
                ],
                "canCancel": true
            }),
        )
        .unwrap();
}

fn address_form() -> AddressForm {
    AddressForm {
        full_name: "Ananya Rao".to_string(),
        phone: "+919845012345".to_string(),
        email: "ananya@example.com".to_string(),
        address_line1: "42 100 Feet Road".to_string(),
        landmark: "Near Metro".to_string(),
        city: "Bengaluru".to_string(),
        state: "Karnataka".to_string(),
        postal_code: "560038".to_string(),
        ..AddressForm::default()
    }
}

#[test]
fn test_guest_to_placed_order() {
    let transport = MemoryTransport::new();
    stub_server(&transport);
    let cache = Cache::in_memory();
    let id = SessionId::new("sess_flow");

    let mut session =
        StorefrontSession::open(id.clone(), StoreConfig::default(), api(&transport), cache.clone())
            .unwrap()
            .with_today(today());

    let roses = Product::new("rose-12", "Red Rose Bouquet", Money::inr(1299));
    let orchid = Product::new("orchid-1", "Purple Orchid", Money::inr(749));
    session.add_to_cart(&roses, 1).unwrap();
    session.add_to_cart(&orchid, 2).unwrap();
    session.apply_coupon("FIRSTBLOOM").unwrap();
    assert!(transport.requests_to(Method::Put, "/api/cart").is_empty());

    session
        .sign_in(&SignInForm::new("ananya@example.com", "bloom123"))
        .unwrap();
    assert_eq!(session.cart().item_count(), 3);

    // Cart -> Shipping
    assert_eq!(session.advance().unwrap(), CheckoutStep::Shipping);
    assert!(session.advance().is_err());

    let address = session.add_address(address_form()).unwrap();
    assert!(address.is_default);
    session.select_address(&address.id).unwrap();
    session
        .set_delivery_option(&DeliveryOptionId::new("standard"))
        .unwrap();

    // Shipping -> Payment
    assert_eq!(session.advance().unwrap(), CheckoutStep::Payment);

    // 1299 + 2 * 749 = 2797, less 20%, plus standard delivery
    let totals = session.totals().unwrap();
    assert_eq!(totals.subtotal, Money::inr(2797));
    assert_eq!(totals.final_amount, Money::new(233_660, Currency::INR));

    session
        .update_payment_data(PaymentDetails::QrCode(QrCodeDetails::new(
            totals.final_amount,
            true,
        )))
        .unwrap();
    assert!(session
        .upi_payment_uri()
        .unwrap()
        .contains("am=2336.60&cu=INR"));

    // Payment -> Review
    assert_eq!(session.advance().unwrap(), CheckoutStep::Review);
    assert!(!session.can_place_order());
    session.set_consent(ReviewConsent::all_given()).unwrap();
    assert!(session.can_place_order());

    let placed = session.place_order().unwrap();
    assert_eq!(placed.order_number, "BB-1001");
    assert_eq!(session.last_order(), Some(&placed));
    assert!(session.cart().is_empty());
    assert!(session.cart().coupon.is_none());
    assert_eq!(session.current_step(), CheckoutStep::Cart);
    assert!(session.state().payment.selected_method.is_none());

    let sent = transport.requests_to(Method::Post, "/api/orders");
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].header("authorization"), Some("Bearer tok-42"));
    let body: Value = sent[0].json().unwrap();
    assert_eq!(body["userId"], "u42");
    assert_eq!(body["total"], "2336.60");
    assert_eq!(body["deliveryCharge"], "99.00");
    assert_eq!(body["discountAmount"], "559.40");
    assert_eq!(body["paymentMethod"], "qrcode");
    assert_eq!(body["couponCode"], "FIRSTBLOOM");
    assert_eq!(body["estimatedDeliveryDate"], "2025-06-20");
    assert_eq!(body["items"].as_array().map(Vec::len), Some(2));

    // The cleared cart was pushed after placement.
    let last_push = transport
        .requests_to(Method::Put, "/api/cart")
        .pop()
        .unwrap();
    let pushed: Value = last_push.json().unwrap();
    assert_eq!(pushed["items"], json!([]));

    let tracking = session.track_order(&placed.id).unwrap();
    assert_eq!(tracking.title, "Order BB-1001");
    assert_eq!(tracking.status_label, "Confirmed");
    assert_eq!(tracking.date_caption, "Estimated Delivery");
    assert!(tracking.can_cancel);

    // A fresh session over the same cache sees the signed-in, emptied state.
    let reopened =
        StorefrontSession::open(id, StoreConfig::default(), api(&transport), cache).unwrap();
    assert!(reopened.is_signed_in());
    assert!(reopened.cart().is_empty());
    assert_eq!(reopened.state().addresses.list().len(), 1);
}

#[test]
fn test_guest_order_without_sync() {
    let transport = MemoryTransport::new();
    stub_server(&transport);
    let config = StoreConfig::default().with_cart_sync(false);
    let mut session = StorefrontSession::start(config, api(&transport), Cache::in_memory())
        .unwrap()
        .with_today(today());

    let lilies = Product::new("lily-6", "White Lily Vase", Money::inr(899));
    session.add_to_cart(&lilies, 1).unwrap();
    let address = session.add_address(address_form()).unwrap();
    session.set_shipping_address(address).unwrap();
    session
        .set_delivery_option(&DeliveryOptionId::new("same-day"))
        .unwrap();
    session
        .update_payment_data(PaymentDetails::CashOnDelivery(CodDetails { confirmed: true }))
        .unwrap();
    session.set_consent(ReviewConsent::all_given()).unwrap();

    let totals = session.totals().unwrap();
    assert_eq!(totals.final_amount, Money::inr(899 + 299 + 50));

    session.place_order().unwrap();

    let sent = transport.requests_to(Method::Post, "/api/orders");
    let body: Value = sent[0].json().unwrap();
    assert!(body.get("userId").is_none());
    assert_eq!(body["paymentCharges"], "50.00");
    assert_eq!(sent[0].header("authorization"), None);
    assert!(transport.requests_to(Method::Put, "/api/cart").is_empty());
}

#[test]
fn test_order_history_needs_sign_in() {
    let transport = MemoryTransport::new();
    let session =
        StorefrontSession::start(StoreConfig::default(), api(&transport), Cache::in_memory())
            .unwrap();
    assert!(matches!(
        session.order_history(),
        Err(StorefrontError::NotSignedIn)
    ));
}
