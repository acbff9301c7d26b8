//! Typed client for the Bouquet Bar REST API.

use crate::content::{sort_newest_first, BlogPost, Course, Testimonial};
use crate::enquiry::{ContactForm, CustomBouquetRequest, EnrollmentForm, NewsletterSignup};
use crate::error::{Result, StorefrontError};
use bloom_auth::{parse_server_error, AuthResponse, SignInForm, SignUpRequest, User};
use bloom_commerce::cart::{
    find_coupon, AppliedCoupon, Cart, Coupon, LineItem, MAX_QUANTITY_PER_ITEM,
};
use bloom_commerce::catalog::Product;
use bloom_commerce::checkout::{OrderRequest, OrderSummary, PlacedOrder, TrackingData};
use bloom_commerce::{CommerceError, Currency, LineItemId, Money, OrderId, ProductId, UserId};
use bloom_data::{
    encode_component, ClientRequestBuilder, FetchClient, FetchError, Response, Transport,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// One line of the server-side cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartPayloadItem {
    pub product_id: ProductId,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    pub quantity: i64,
    /// Unit price, decimal string.
    pub price: String,
}

/// Body of `GET` and `PUT /api/cart`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartPayload {
    #[serde(default)]
    pub items: Vec<CartPayloadItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,
}

impl CartPayload {
    pub fn from_cart(cart: &Cart) -> Self {
        Self {
            items: cart
                .items
                .iter()
                .map(|item| CartPayloadItem {
                    product_id: item.product_id.clone(),
                    name: item.name.clone(),
                    image: item.image.clone(),
                    quantity: item.quantity,
                    price: item.unit_price.to_decimal_string(),
                })
                .collect(),
            coupon_code: cart.coupon.as_ref().map(|c| c.code.clone()),
        }
    }

    /// Rebuild a cart for `user_id`.
    ///
    /// Lines with a non-positive quantity are dropped and oversized ones
    /// clamped. A coupon code the store does not know is dropped.
    pub fn into_cart(
        self,
        user_id: UserId,
        coupons: &[Coupon],
        currency: Currency,
    ) -> Result<Cart, CommerceError> {
        let mut cart = Cart::for_user(user_id);
        cart.currency = currency;

        for line in self.items {
            if line.quantity <= 0 {
                continue;
            }
            let unit_price = Money::parse_decimal(&line.price, currency).ok_or_else(|| {
                CommerceError::ValidationError(format!(
                    "invalid price '{}' for {}",
                    line.price, line.product_id
                ))
            })?;
            let mut item = LineItem {
                id: LineItemId::generate(),
                product_id: line.product_id,
                name: line.name,
                image: line.image,
                quantity: line.quantity.min(MAX_QUANTITY_PER_ITEM),
                unit_price,
                total_price: unit_price,
            };
            item.update_total()?;
            cart.items.push(item);
        }

        if let Some(code) = self.coupon_code {
            match find_coupon(coupons, &code) {
                Ok(coupon) => cart.coupon = Some(AppliedCoupon::from(coupon.clone())),
                Err(_) => tracing::debug!(code = %code, "dropping unknown coupon from server cart"),
            }
        }

        Ok(cart)
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PlaceOrderReply {
    Wrapped { order: PlacedOrder },
    Bare(PlacedOrder),
}

impl From<PlaceOrderReply> for PlacedOrder {
    fn from(reply: PlaceOrderReply) -> Self {
        match reply {
            PlaceOrderReply::Wrapped { order } | PlaceOrderReply::Bare(order) => order,
        }
    }
}

#[derive(Debug, Serialize)]
struct ResetPasswordBody<'a> {
    token: &'a str,
    password: &'a str,
}

/// The storefront's view of the backend.
#[derive(Debug, Clone)]
pub struct StorefrontApi<T> {
    client: FetchClient<T>,
}

impl<T: Transport> StorefrontApi<T> {
    pub fn new(transport: T, base_url: impl Into<String>) -> Self {
        Self::from_client(FetchClient::new(transport).with_base_url(base_url))
    }

    pub fn from_client(client: FetchClient<T>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &FetchClient<T> {
        &self.client
    }

    // Catalog

    pub fn products(&self) -> Result<Vec<Product>> {
        self.fetch(self.client.get("/api/products"))
    }

    pub fn product(&self, id: &ProductId) -> Result<Product> {
        let path = format!("/api/products/{}", encode_component(id.as_str()));
        self.fetch(self.client.get(path))
    }

    // Cart

    /// The saved server cart. `None` when the shopper has none yet (404 or
    /// an empty body); any other failure is an error.
    pub fn fetch_cart(&self, token: Option<&str>) -> Result<Option<CartPayload>> {
        let response = self
            .client
            .get("/api/cart")
            .maybe_bearer_auth(token)
            .accept("application/json")
            .send()?;
        if response.status == 404 || (response.is_success() && response.is_empty()) {
            return Ok(None);
        }
        if !response.is_success() {
            return Err(api_error(&response));
        }
        Ok(Some(response.json()?))
    }

    pub fn save_cart(&self, token: Option<&str>, cart: &CartPayload) -> Result<()> {
        let request = self.client.put("/api/cart").maybe_bearer_auth(token).json(cart)?;
        self.execute(request).map(drop)
    }

    // Orders

    /// Post an order. The reply may wrap the order in `{order: ...}`.
    pub fn place_order(&self, token: Option<&str>, order: &OrderRequest) -> Result<PlacedOrder> {
        let request = self
            .client
            .post("/api/orders")
            .maybe_bearer_auth(token)
            .json(order)?;
        let reply: PlaceOrderReply = self.fetch(request)?;
        Ok(reply.into())
    }

    pub fn orders(&self, token: Option<&str>) -> Result<Vec<OrderSummary>> {
        self.fetch(self.client.get("/api/orders").maybe_bearer_auth(token))
    }

    pub fn order(&self, token: Option<&str>, id: &OrderId) -> Result<OrderSummary> {
        let path = format!("/api/orders/{}", encode_component(id.as_str()));
        self.fetch(self.client.get(path).maybe_bearer_auth(token))
    }

    pub fn tracking(&self, token: Option<&str>, id: &OrderId) -> Result<TrackingData> {
        let path = format!("/api/orders/{}/tracking", encode_component(id.as_str()));
        self.fetch(self.client.get(path).maybe_bearer_auth(token))
    }

    pub fn cancel_order(&self, token: Option<&str>, id: &OrderId) -> Result<()> {
        let path = format!("/api/orders/{}/cancel", encode_component(id.as_str()));
        self.execute(self.client.post(path).maybe_bearer_auth(token))
            .map(drop)
    }

    // Auth

    pub fn sign_up(&self, request: &SignUpRequest) -> Result<AuthResponse> {
        let request = self.client.post("/api/auth/signup").json(request)?;
        self.auth_call(request, "Failed to create account")
    }

    pub fn sign_in(&self, form: &SignInForm) -> Result<AuthResponse> {
        let request = self.client.post("/api/auth/signin").json(form)?;
        self.auth_call(request, "Failed to sign in")
    }

    pub fn sign_out(&self, token: Option<&str>) -> Result<()> {
        let request = self.client.post("/api/auth/signout").maybe_bearer_auth(token);
        self.execute(request).map(drop)
    }

    pub fn current_user(&self, token: Option<&str>) -> Result<User> {
        let request = self.client.get("/api/auth/user").maybe_bearer_auth(token);
        self.auth_call(request, "Not authenticated")
    }

    pub fn forgot_password(&self, email: &str) -> Result<()> {
        let request = self
            .client
            .post("/api/auth/forgot-password")
            .json(&serde_json::json!({ "email": email.trim() }))?;
        self.auth_call::<serde_json::Value>(request, "Failed to send reset link")
            .map(drop)
    }

    pub fn reset_password(&self, token: &str, password: &str) -> Result<()> {
        let request = self
            .client
            .post("/api/auth/reset-password")
            .json(&ResetPasswordBody { token, password })?;
        self.auth_call::<serde_json::Value>(request, "Failed to reset password")
            .map(drop)
    }

    // Enquiries

    pub fn subscribe_newsletter(&self, signup: &NewsletterSignup) -> Result<()> {
        let request = self.client.post("/api/landing/email").json(signup)?;
        self.execute(request).map(drop)
    }

    pub fn send_contact(&self, form: &ContactForm) -> Result<()> {
        let request = self.client.post("/api/landing/contact").json(form)?;
        self.execute(request).map(drop)
    }

    pub fn request_custom_bouquet(&self, request: &CustomBouquetRequest) -> Result<()> {
        let request = self.client.post("/api/orders").json(request)?;
        self.execute(request).map(drop)
    }

    pub fn enroll(&self, form: &EnrollmentForm) -> Result<()> {
        let request = self.client.post("/api/enrollments").json(form)?;
        self.execute(request).map(drop)
    }

    // Content

    pub fn testimonials(&self) -> Result<Vec<Testimonial>> {
        self.fetch(self.client.get("/api/testimonials"))
    }

    /// Blog posts, newest first.
    pub fn blog_posts(&self) -> Result<Vec<BlogPost>> {
        let mut posts: Vec<BlogPost> = self.fetch(self.client.get("/api/blog"))?;
        sort_newest_first(&mut posts);
        Ok(posts)
    }

    pub fn courses(&self) -> Result<Vec<Course>> {
        self.fetch(self.client.get("/api/courses"))
    }

    fn execute(&self, request: ClientRequestBuilder<'_, T>) -> Result<Response> {
        let response = request.accept("application/json").send()?;
        if response.is_success() {
            Ok(response)
        } else {
            Err(api_error(&response))
        }
    }

    fn fetch<R: DeserializeOwned>(&self, request: ClientRequestBuilder<'_, T>) -> Result<R> {
        Ok(self.execute(request)?.json()?)
    }

    /// Auth endpoints report failures as field errors or a message.
    fn auth_call<R: DeserializeOwned>(
        &self,
        request: ClientRequestBuilder<'_, T>,
        fallback: &str,
    ) -> Result<R> {
        let response = request.accept("application/json").send()?;
        if !response.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(parse_server_error(response.status, &body, fallback).into());
        }
        if response.is_empty() {
            return Ok(serde_json::from_value(serde_json::Value::Null).map_err(FetchError::from)?);
        }
        Ok(response.json()?)
    }
}

/// Map a non-2xx reply to [`StorefrontError::Api`], preferring the body's
/// `message`, then a plain-text body, then a generic line.
fn api_error(response: &Response) -> StorefrontError {
    let message = response
        .message()
        .unwrap_or_else(|| format!("Request failed with status {}", response.status));

    tracing::debug!(status = response.status, message = %message, "api error");
    StorefrontError::Api {
        status: response.status,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bloom_auth::AuthError;
    use bloom_data::{MemoryTransport, Method};
    use serde_json::json;

    fn api() -> (MemoryTransport, StorefrontApi<MemoryTransport>) {
        let transport = MemoryTransport::new();
        let api = StorefrontApi::new(transport.clone(), "http://localhost:5000");
        (transport, api)
    }

    #[test]
    fn test_products_parsed_from_records() {
        let (transport, api) = api();
        transport
            .respond_json(
                Method::Get,
                "/api/products",
                200,
                &json!([{"id":"1","name":"Sunflower Bunch","price":"649.00","category":"sunflowers"}]),
            )
            .unwrap();
        let products = api.products().unwrap();
        assert_eq!(products[0].price, Money::inr(649));
    }

    #[test]
    fn test_fetch_cart_missing_versus_failed() {
        let (transport, api) = api();
        assert_eq!(api.fetch_cart(Some("t")).unwrap(), None);

        transport.respond(Method::Get, "/api/cart", Response::empty(200));
        assert_eq!(api.fetch_cart(Some("t")).unwrap(), None);

        transport.reset();
        transport.respond(Method::Get, "/api/cart", Response::empty(503));
        assert_eq!(api.fetch_cart(Some("t")).unwrap_err().status(), Some(503));

        transport.reset();
        transport
            .respond_json(Method::Get, "/api/cart", 200, &json!({"items": []}))
            .unwrap();
        assert_eq!(api.fetch_cart(Some("t")).unwrap(), Some(CartPayload::default()));
    }

    #[test]
    fn test_api_error_messages() {
        let (transport, api) = api();
        transport
            .respond_json(Method::Get, "/api/courses", 500, &json!({"message":"Database offline"}))
            .unwrap();
        transport.respond(
            Method::Get,
            "/api/testimonials",
            Response::new(502, Default::default(), b"Bad gateway".to_vec()),
        );
        transport.respond(Method::Get, "/api/blog", Response::empty(503));

        let err = api.courses().unwrap_err();
        assert_eq!(err.to_string(), "Database offline");
        assert_eq!(err.status(), Some(500));
        assert_eq!(api.testimonials().unwrap_err().to_string(), "Bad gateway");
        assert_eq!(
            api.blog_posts().unwrap_err().to_string(),
            "Request failed with status 503"
        );
    }

    #[test]
    fn test_place_order_reply_shapes() {
        let wrapped: PlaceOrderReply =
            serde_json::from_value(json!({"order": {"id": "ord-9", "ordernumber": "BB-1009"}}))
                .unwrap();
        let bare: PlaceOrderReply =
            serde_json::from_value(json!({"id": "ord-10", "orderNumber": "BB-1010"})).unwrap();

        let wrapped = PlacedOrder::from(wrapped);
        assert_eq!(wrapped.id.as_str(), "ord-9");
        assert_eq!(wrapped.order_number, "BB-1009");
        assert_eq!(PlacedOrder::from(bare).order_number, "BB-1010");
    }

    #[test]
    fn test_sign_in_errors_go_through_auth_parser() {
        let (transport, api) = api();
        transport.respond(Method::Post, "/api/auth/signin", Response::empty(401));
        let err = api
            .sign_in(&SignInForm::new("priya@example.com", "wrong"))
            .unwrap_err();
        assert!(matches!(
            err,
            StorefrontError::Auth(AuthError::InvalidCredentials)
        ));

        transport.reset();
        transport
            .respond_json(
                Method::Post,
                "/api/auth/signin",
                400,
                &json!({"errors": {"email": "No account with this email"}}),
            )
            .unwrap();
        let err = api
            .sign_in(&SignInForm::new("x@example.com", "secret1"))
            .unwrap_err();
        assert_eq!(
            err.field_errors().and_then(|f| f.get("email")),
            Some("No account with this email")
        );
    }

    #[test]
    fn test_cart_payload_round_trip_into_cart() {
        let payload: CartPayload = serde_json::from_value(json!({
            "items": [
                {"productId": "p1", "name": "Lily Vase", "quantity": 2, "price": "899.50"},
                {"productId": "p2", "name": "Ghost line", "quantity": 0, "price": "10.00"},
                {"productId": "p3", "name": "Bulk roses", "quantity": 150, "price": "20"}
            ],
            "couponCode": "firstbloom"
        }))
        .unwrap();

        let cart = payload
            .into_cart(UserId::new("u1"), &[Coupon::first_bloom()], Currency::INR)
            .unwrap();
        assert_eq!(cart.items.len(), 2);
        assert_eq!(cart.items[0].total_price, Money::new(179_900, Currency::INR));
        assert_eq!(cart.items[1].quantity, MAX_QUANTITY_PER_ITEM);
        assert_eq!(cart.coupon.as_ref().map(|c| c.code.as_str()), Some("FIRSTBLOOM"));
        assert_eq!(cart.user_id, Some(UserId::new("u1")));

        let back = CartPayload::from_cart(&cart);
        assert_eq!(back.items[0].price, "899.50");
        assert_eq!(back.coupon_code.as_deref(), Some("FIRSTBLOOM"));
    }

    #[test]
    fn test_unknown_server_coupon_dropped() {
        let payload = CartPayload {
            items: Vec::new(),
            coupon_code: Some("EXPIRED10".to_string()),
        };
        let cart = payload
            .into_cart(UserId::new("u1"), &[Coupon::first_bloom()], Currency::INR)
            .unwrap();
        assert!(cart.coupon.is_none());
    }

    #[test]
    fn test_cart_requests_carry_token() {
        let (transport, api) = api();
        transport
            .respond_json(Method::Put, "/api/cart", 200, &json!({}))
            .unwrap();
        api.save_cart(Some("tok-1"), &CartPayload::default()).unwrap();

        let sent = transport.requests_to(Method::Put, "/api/cart");
        assert_eq!(sent[0].header("authorization"), Some("Bearer tok-1"));
        assert_eq!(sent[0].json::<serde_json::Value>().unwrap(), json!({"items": []}));
    }

    #[test]
    fn test_enquiry_endpoints() {
        let (transport, api) = api();
        transport
            .respond_json(Method::Post, "/api/landing/email", 201, &json!({"ok": true}))
            .unwrap();
        api.subscribe_newsletter(&NewsletterSignup::new("a@b.co")).unwrap();

        let sent = transport.requests_to(Method::Post, "/api/landing/email");
        assert_eq!(sent[0].json::<serde_json::Value>().unwrap(), json!({"email": "a@b.co"}));

        let err = api
            .enroll(&EnrollmentForm::default())
            .unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_tracking_path_is_encoded() {
        let (transport, api) = api();
        let _ = api.tracking(None, &OrderId::new("ord 1/2"));
        let sent = transport.requests();
        assert!(sent[0].url.ends_with("/api/orders/ord%201%2F2/tracking"));
    }
}
