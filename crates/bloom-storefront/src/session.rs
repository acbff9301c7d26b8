//! The storefront session: one shopper's cart, checkout and sign-in.
//!
//! A session is opened on page load, restored from the cache when a saved
//! state exists, and torn down on sign-out. Every mutation is written back
//! to the cache under the session id.
//!
//! Cart mutations are optimistic. The change is applied and saved locally
//! first; for signed-in shoppers it is then pushed to `/api/cart`, and if the
//! server rejects it the whole state is rolled back to the snapshot taken
//! before the change.

use crate::api::{CartPayload, StorefrontApi};
use crate::config::StoreConfig;
use crate::error::{Result, StorefrontError};
use bloom_auth::{AuthSession, AuthStore, SignInForm, SignUpForm, User};
use bloom_cache::{Cache, KvStore, Session, SessionId};
use bloom_commerce::cart::{find_coupon, AppliedCoupon, Cart, PriceBreakdown};
use bloom_commerce::catalog::Product;
use bloom_commerce::checkout::{
    can_place_order, validation_errors, Address, AddressBook, AddressForm, CheckoutFlow,
    CheckoutStep, Customer, DeliveryOption, OrderRequest, OrderSummary, PlacedOrder, Readiness,
    ReviewConsent, TrackingView,
};
use bloom_commerce::payment::{PaymentContext, PaymentData, PaymentDetails, PaymentMethod};
use bloom_commerce::{
    AddressId, CommerceError, DeliveryOptionId, LineItemId, OrderId, ProductId, UserId,
};
use bloom_data::Transport;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Cache namespace for saved checkout state.
const STATE_NAMESPACE: &str = "storefront";

/// Shown when the review checkboxes are not all ticked.
pub const CONSENT_REQUIRED: &str = "Please accept the terms and privacy policy and confirm the order";

/// Everything the cart context keeps between page loads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckoutState {
    pub cart: Cart,
    pub addresses: AddressBook,
    pub shipping_address: Option<Address>,
    pub delivery_option: Option<DeliveryOptionId>,
    pub payment: PaymentData,
    pub flow: CheckoutFlow,
    pub consent: ReviewConsent,
}

/// One shopper's storefront state.
pub struct StorefrontSession<S, T> {
    id: SessionId,
    config: StoreConfig,
    api: StorefrontApi<T>,
    store: Session<CheckoutState, S>,
    auth_store: AuthStore<S>,
    state: CheckoutState,
    auth: Option<AuthSession>,
    placing: bool,
    /// Signed in but the server cart has not been read yet. Pushes wait
    /// until it has been merged, so a failed read never overwrites it.
    server_cart_pending: bool,
    last_order: Option<PlacedOrder>,
    today: Option<NaiveDate>,
}

impl<S, T> StorefrontSession<S, T>
where
    S: KvStore + Clone,
    T: Transport,
{
    /// Open session `id`, restoring saved state and sign-in if present.
    pub fn open(
        id: SessionId,
        config: StoreConfig,
        api: StorefrontApi<T>,
        cache: Cache<S>,
    ) -> Result<Self> {
        let store: Session<CheckoutState, S> =
            Session::with_namespace(cache.clone(), STATE_NAMESPACE);
        let auth_store = AuthStore::new(cache);

        let restored = store.get(&id)?;
        let is_new = restored.is_none();
        let mut state = restored.unwrap_or_default();
        if is_new {
            state.cart.currency = config.currency;
        }

        let auth = auth_store.load(&id)?;
        if let Some(session) = &auth {
            if state.cart.user_id.as_ref() != Some(session.user_id()) {
                state.cart.set_user(session.user_id().clone());
            }
        }

        tracing::info!(
            session = %id,
            restored = !is_new,
            signed_in = auth.is_some(),
            items = state.cart.item_count(),
            "storefront session opened"
        );

        Ok(Self {
            id,
            config,
            api,
            store,
            auth_store,
            state,
            auth,
            placing: false,
            server_cart_pending: false,
            last_order: None,
            today: None,
        })
    }

    /// Open a fresh session with a generated id.
    pub fn start(config: StoreConfig, api: StorefrontApi<T>, cache: Cache<S>) -> Result<Self> {
        Self::open(SessionId::generate(), config, api, cache)
    }

    /// Fix the date used for card expiry and delivery estimates.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn api(&self) -> &StorefrontApi<T> {
        &self.api
    }

    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    pub fn cart(&self) -> &Cart {
        &self.state.cart
    }

    pub fn auth(&self) -> Option<&AuthSession> {
        self.auth.as_ref()
    }

    pub fn user(&self) -> Option<&User> {
        self.auth.as_ref().map(|a| &a.user)
    }

    pub fn is_signed_in(&self) -> bool {
        self.auth.is_some()
    }

    pub fn is_placing(&self) -> bool {
        self.placing
    }

    /// The order placed most recently in this session.
    pub fn last_order(&self) -> Option<&PlacedOrder> {
        self.last_order.as_ref()
    }

    pub fn today(&self) -> NaiveDate {
        self.today
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    fn user_id(&self) -> Option<UserId> {
        self.auth.as_ref().map(|a| a.user_id().clone())
    }

    fn token(&self) -> Option<&str> {
        self.auth.as_ref().and_then(|a| a.bearer_token())
    }

    fn persist(&self) -> Result<()> {
        self.store.set(&self.id, &self.state)?;
        Ok(())
    }

    // Cart

    pub fn add_to_cart(&mut self, product: &Product, quantity: i64) -> Result<LineItemId> {
        self.mutate_cart("add_to_cart", |cart| cart.add_item(product, quantity))
    }

    /// Returns whether the product was in the cart.
    pub fn remove_from_cart(&mut self, product_id: &ProductId) -> Result<bool> {
        self.mutate_cart("remove_from_cart", |cart| Ok(cart.remove_item(product_id)))
    }

    /// Set a line's quantity; zero or less removes it.
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: i64) -> Result<bool> {
        self.mutate_cart("update_quantity", |cart| {
            cart.update_quantity(product_id, quantity)
        })
    }

    pub fn clear_cart(&mut self) -> Result<()> {
        self.mutate_cart("clear_cart", |cart| {
            cart.clear();
            Ok(())
        })
    }

    /// Apply one of the store's coupons by code.
    pub fn apply_coupon(&mut self, code: &str) -> Result<AppliedCoupon> {
        let coupon = find_coupon(&self.config.coupons, code)?.clone();
        self.mutate_cart("apply_coupon", move |cart| {
            cart.apply_coupon(coupon).cloned()
        })
    }

    pub fn remove_coupon(&mut self) -> Result<bool> {
        self.mutate_cart("remove_coupon", |cart| Ok(cart.remove_coupon()))
    }

    /// Apply `f` to the cart, save, then sync. Any failure restores the
    /// state from before the call.
    fn mutate_cart<R, F>(&mut self, action: &'static str, f: F) -> Result<R>
    where
        F: FnOnce(&mut Cart) -> Result<R, CommerceError>,
    {
        let snapshot = self.state.clone();
        let pending = self.server_cart_pending;

        let outcome = match f(&mut self.state.cart).and_then(|outcome| {
            drop_stale_coupon(&mut self.state.cart)?;
            Ok(outcome)
        }) {
            Ok(outcome) => outcome,
            Err(e) => {
                self.state = snapshot;
                return Err(e.into());
            }
        };
        if self.state.cart.is_empty() {
            self.state.flow.invalidate_from(CheckoutStep::Cart);
        }

        if let Err(e) = self.persist() {
            self.state = snapshot;
            return Err(e);
        }

        if let Err(e) = self.push_cart() {
            tracing::warn!(
                session = %self.id,
                action,
                error = %e,
                "cart sync rejected, rolling back"
            );
            self.state = snapshot;
            self.server_cart_pending = pending;
            self.persist()?;
            return Err(e);
        }

        tracing::debug!(
            session = %self.id,
            action,
            items = self.state.cart.item_count(),
            "cart updated"
        );
        Ok(outcome)
    }

    /// Push the cart to the server for signed-in shoppers.
    ///
    /// While the server cart is unread it is fetched and merged first; if it
    /// still cannot be read the push is skipped and the cart stays local.
    fn push_cart(&mut self) -> Result<()> {
        if !self.config.sync_cart {
            return Ok(());
        }
        let Some(auth) = &self.auth else {
            return Ok(());
        };
        let token = auth.bearer_token().map(str::to_string);

        if self.server_cart_pending {
            let user_id = auth.user_id().clone();
            match self.fetch_server_cart(token.as_deref(), &user_id) {
                Ok(mut server) => {
                    server.merge(self.state.cart.clone())?;
                    server.set_user(user_id);
                    drop_stale_coupon(&mut server)?;
                    self.state.cart = server;
                    self.server_cart_pending = false;
                    self.persist()?;
                }
                Err(e) => {
                    tracing::warn!(
                        session = %self.id,
                        error = %e,
                        "server cart unreadable, keeping cart local"
                    );
                    return Ok(());
                }
            }
        }

        self.api
            .save_cart(token.as_deref(), &CartPayload::from_cart(&self.state.cart))
    }

    // Address and delivery

    /// Validate a form and save it to the address book.
    pub fn add_address(&mut self, form: AddressForm) -> Result<Address> {
        let address = form.into_address(AddressId::generate(), self.user_id())?;
        let saved = self.state.addresses.add(address).clone();
        self.persist()?;
        Ok(saved)
    }

    /// Ship to a saved address.
    pub fn select_address(&mut self, id: &AddressId) -> Result<()> {
        let address = self
            .state
            .addresses
            .get(id)
            .cloned()
            .ok_or_else(|| CommerceError::ValidationError(format!("unknown address {}", id)))?;
        self.set_shipping_address(address)
    }

    pub fn set_shipping_address(&mut self, address: Address) -> Result<()> {
        tracing::debug!(session = %self.id, address = %address.id, "shipping address set");
        self.state.shipping_address = Some(address);
        self.persist()
    }

    pub fn clear_shipping_address(&mut self) -> Result<()> {
        self.state.shipping_address = None;
        self.state.flow.invalidate_from(CheckoutStep::Shipping);
        self.persist()
    }

    pub fn set_delivery_option(&mut self, id: &DeliveryOptionId) -> Result<&DeliveryOption> {
        if self.config.delivery_option(id).is_none() {
            return Err(CommerceError::UnknownDeliveryOption(id.to_string()).into());
        }
        self.state.delivery_option = Some(id.clone());
        self.persist()?;
        self.delivery_option()
            .ok_or_else(|| CommerceError::UnknownDeliveryOption(id.to_string()).into())
    }

    /// The chosen delivery tier, if the store still offers it.
    pub fn delivery_option(&self) -> Option<&DeliveryOption> {
        self.state
            .delivery_option
            .as_ref()
            .and_then(|id| self.config.delivery_option(id))
    }

    // Payment

    pub fn set_payment_method(&mut self, method: PaymentMethod) -> Result<()> {
        self.state.payment.select(method);
        self.persist()
    }

    /// Store a method's form data and select that method.
    pub fn update_payment_data(&mut self, details: PaymentDetails) -> Result<()> {
        self.state.payment.update(details);
        self.persist()
    }

    /// Price breakdown for the current cart, delivery tier and payment method.
    pub fn totals(&self) -> Result<PriceBreakdown> {
        let payment_charge = self.state.payment.charge(self.config.cod_fee);
        Ok(PriceBreakdown::calculate(
            &self.state.cart,
            self.delivery_option(),
            payment_charge,
        )?)
    }

    pub fn payment_context(&self) -> Result<PaymentContext> {
        Ok(PaymentContext {
            today: self.today(),
            order_total: self.totals()?.final_amount,
        })
    }

    /// Validate the selected method against today's date and the current total.
    pub fn validate_payment(&self) -> Result<PaymentDetails> {
        let ctx = self.payment_context()?;
        Ok(self.state.payment.validate(&ctx)?)
    }

    /// `upi://pay` link for the QR code, for the current total.
    pub fn upi_payment_uri(&self) -> Result<String> {
        Ok(self
            .config
            .upi_payee
            .payment_uri(self.totals()?.final_amount))
    }

    // Wizard

    pub fn readiness(&self) -> Readiness {
        Readiness {
            has_items: !self.state.cart.is_empty(),
            has_shipping_address: self.state.shipping_address.is_some(),
            has_delivery_option: self.delivery_option().is_some(),
            payment_valid: self.validate_payment().is_ok(),
        }
    }

    pub fn current_step(&self) -> CheckoutStep {
        self.state.flow.step
    }

    pub fn advance(&mut self) -> Result<CheckoutStep> {
        let readiness = self.readiness();
        let step = self.state.flow.advance(&readiness)?;
        self.persist()?;
        Ok(step)
    }

    pub fn go_back(&mut self) -> Result<CheckoutStep> {
        let step = self.state.flow.go_back()?;
        self.persist()?;
        Ok(step)
    }

    pub fn go_to(&mut self, step: CheckoutStep) -> Result<()> {
        self.state.flow.go_to(step)?;
        self.persist()
    }

    pub fn set_consent(&mut self, consent: ReviewConsent) -> Result<()> {
        self.state.consent = consent;
        self.persist()
    }

    /// Messages listed on the review page.
    pub fn review_errors(&self) -> Vec<String> {
        validation_errors(&self.readiness())
    }

    pub fn can_place_order(&self) -> bool {
        can_place_order(&self.readiness(), &self.state.consent, self.placing)
    }

    // Orders

    /// Submit the order.
    ///
    /// On success the cart, coupon, payment data and wizard are reset. On
    /// failure nothing changes, so the shopper can retry.
    pub fn place_order(&mut self) -> Result<PlacedOrder> {
        if self.placing {
            return Err(StorefrontError::OrderInFlight);
        }

        let missing = self.review_errors();
        if !missing.is_empty() {
            return Err(CommerceError::CheckoutIncomplete(missing).into());
        }
        if !self.state.consent.is_complete() {
            return Err(CommerceError::CheckoutIncomplete(vec![CONSENT_REQUIRED.to_string()]).into());
        }

        let payment = self.validate_payment()?;
        let pricing = self.totals()?;
        let incomplete = |what: &str| CommerceError::CheckoutIncomplete(vec![what.to_string()]);
        let address = self
            .state
            .shipping_address
            .as_ref()
            .ok_or_else(|| incomplete("Shipping address not selected"))?;
        let delivery = self
            .delivery_option()
            .ok_or_else(|| incomplete("Delivery option not selected"))?;
        let customer = Customer::from_address(
            address,
            self.user_id(),
            self.user().map(|u| u.email.as_str()),
        );
        let request = OrderRequest::build(
            &self.state.cart,
            &pricing,
            customer,
            address,
            delivery,
            &payment,
            self.today(),
        )?;

        self.placing = true;
        tracing::info!(
            session = %self.id,
            total = %pricing.final_amount,
            method = %payment.method(),
            "placing order"
        );
        let result = self.api.place_order(self.token(), &request);
        self.placing = false;

        let placed = match result {
            Ok(placed) => placed,
            Err(e) => {
                tracing::warn!(session = %self.id, error = %e, "order placement failed");
                return Err(e);
            }
        };

        tracing::info!(
            session = %self.id,
            order = %placed.id,
            order_number = %placed.order_number,
            "order placed"
        );

        self.state.cart.clear();
        self.state.payment.clear();
        self.state.flow.reset();
        self.state.consent = ReviewConsent::default();
        self.last_order = Some(placed.clone());
        self.persist()?;
        if let Err(e) = self.push_cart() {
            tracing::warn!(session = %self.id, error = %e, "failed to clear server cart");
        }

        Ok(placed)
    }

    /// The signed-in shopper's past orders.
    pub fn order_history(&self) -> Result<Vec<OrderSummary>> {
        let auth = self.auth.as_ref().ok_or(StorefrontError::NotSignedIn)?;
        self.api.orders(auth.bearer_token())
    }

    pub fn track_order(&self, id: &OrderId) -> Result<TrackingView> {
        Ok(self.api.tracking(self.token(), id)?.view())
    }

    /// Cancel an order the server still allows cancelling.
    pub fn cancel_order(&self, id: &OrderId) -> Result<()> {
        let tracking = self.api.tracking(self.token(), id)?;
        if !tracking.can_cancel {
            return Err(CommerceError::ValidationError(format!(
                "order {} can no longer be cancelled",
                tracking.order.order_number
            ))
            .into());
        }
        tracing::info!(session = %self.id, order = %id, "cancelling order");
        self.api.cancel_order(self.token(), id)
    }

    // Auth

    pub fn sign_in(&mut self, form: &SignInForm) -> Result<&User> {
        form.validate()?;
        let response = self.api.sign_in(form)?;
        self.establish(AuthSession::from(response))
    }

    pub fn sign_up(&mut self, form: &SignUpForm) -> Result<&User> {
        let request = form.validate()?;
        let response = self.api.sign_up(&request)?;
        self.establish(AuthSession::from(response))
    }

    /// Save the sign-in and merge the guest cart into the shopper's server
    /// cart.
    ///
    /// When the server cart cannot be read the guest cart is kept as is and
    /// the merge is retried on the next cart change.
    fn establish(&mut self, session: AuthSession) -> Result<&User> {
        let user_id = session.user_id().clone();
        self.auth_store.save(&self.id, &session)?;

        self.state.cart.set_user(user_id.clone());
        self.auth = Some(session);
        self.server_cart_pending = self.config.sync_cart;
        if let Err(e) = self.push_cart() {
            tracing::warn!(session = %self.id, error = %e, "failed to push merged cart");
        }
        self.persist()?;

        tracing::info!(
            session = %self.id,
            user = %user_id,
            items = self.state.cart.item_count(),
            "signed in"
        );
        self.user().ok_or(StorefrontError::NotSignedIn)
    }

    /// The shopper's saved server cart; empty when they have none yet.
    fn fetch_server_cart(&self, token: Option<&str>, user_id: &UserId) -> Result<Cart> {
        match self.api.fetch_cart(token)? {
            Some(payload) => {
                Ok(payload.into_cart(user_id.clone(), &self.config.coupons, self.config.currency)?)
            }
            None => {
                let mut cart = Cart::for_user(user_id.clone());
                cart.currency = self.config.currency;
                Ok(cart)
            }
        }
    }

    /// Reload the user from `/api/auth/user`. A rejected token signs the
    /// shopper out locally.
    pub fn refresh_user(&mut self) -> Result<&User> {
        let token = match &self.auth {
            Some(auth) => auth.bearer_token().map(str::to_string),
            None => return Err(StorefrontError::NotSignedIn),
        };

        match self.api.current_user(token.as_deref()) {
            Ok(user) => {
                if let Some(auth) = self.auth.as_mut() {
                    auth.user = user;
                    auth.touch();
                    self.auth_store.save(&self.id, auth)?;
                }
                self.user().ok_or(StorefrontError::NotSignedIn)
            }
            Err(StorefrontError::Auth(e)) if e.is_auth_failure() => {
                tracing::info!(session = %self.id, "token rejected, dropping sign-in");
                self.auth = None;
                self.auth_store.clear(&self.id)?;
                Err(StorefrontError::NotSignedIn)
            }
            Err(e) => Err(e),
        }
    }

    /// Sign out and tear the session down.
    ///
    /// The server call is best effort; local state is always cleared.
    pub fn sign_out(&mut self) -> Result<()> {
        if let Some(auth) = self.auth.take() {
            if let Err(e) = self.api.sign_out(auth.bearer_token()) {
                tracing::warn!(session = %self.id, error = %e, "server sign-out failed");
            }
        }
        self.auth_store.clear(&self.id)?;
        self.store.delete(&self.id)?;

        self.state = CheckoutState::default();
        self.state.cart.currency = self.config.currency;
        self.placing = false;
        self.server_cart_pending = false;
        self.last_order = None;
        Ok(())
    }
}

/// Detach a coupon the cart no longer qualifies for.
fn drop_stale_coupon(cart: &mut Cart) -> Result<(), CommerceError> {
    let Some(applied) = &cart.coupon else {
        return Ok(());
    };
    if let Err(e) = applied.coupon.check(&cart.subtotal()?) {
        tracing::warn!(code = %applied.code, reason = %e, "removing coupon");
        cart.remove_coupon();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bloom_cache::MemoryStore;
    use bloom_commerce::cart::Coupon;
    use bloom_commerce::payment::{CodDetails, UpiDetails};
    use bloom_commerce::{Currency, Money};
    use bloom_data::{MemoryTransport, Method, Response};
    use serde_json::json;

    type TestSession = StorefrontSession<MemoryStore, MemoryTransport>;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn session_with(transport: &MemoryTransport, cache: &Cache) -> TestSession {
        let api = StorefrontApi::new(transport.clone(), "http://localhost:5000");
        StorefrontSession::open(
            SessionId::new("sess_test"),
            StoreConfig::default(),
            api,
            cache.clone(),
        )
        .unwrap()
        .with_today(today())
    }

    fn rose() -> Product {
        Product::new("rose-12", "Red Rose Bouquet", Money::inr(1299))
    }

    fn lily() -> Product {
        Product::new("lily-6", "White Lily Vase", Money::inr(899))
    }

    fn address_form() -> AddressForm {
        AddressForm {
            full_name: "Priya Sharma".to_string(),
            phone: "9876543210".to_string(),
            email: "priya@example.com".to_string(),
            address_line1: "12 MG Road".to_string(),
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            postal_code: "560001".to_string(),
            ..AddressForm::default()
        }
    }

    fn sign_in(session: &mut TestSession, transport: &MemoryTransport) {
        transport
            .respond_json(
                Method::Post,
                "/api/auth/signin",
                200,
                &json!({"user": {"id": "u1", "email": "priya@example.com", "firstname": "Priya"}, "token": "tok"}),
            )
            .unwrap();
        session
            .sign_in(&SignInForm::new("priya@example.com", "secret1"))
            .unwrap();
    }

    #[test]
    fn test_guest_mutations_persist_and_skip_sync() {
        let transport = MemoryTransport::new();
        let cache = Cache::in_memory();
        let mut session = session_with(&transport, &cache);

        session.add_to_cart(&rose(), 2).unwrap();
        session.apply_coupon("firstbloom").unwrap();
        assert!(transport.requests().is_empty());

        let reopened = session_with(&transport, &cache);
        assert_eq!(reopened.cart().quantity_of(&rose().id), 2);
        assert_eq!(
            reopened.cart().coupon.as_ref().map(|c| c.code.as_str()),
            Some("FIRSTBLOOM")
        );
    }

    #[test]
    fn test_local_failure_leaves_cart_untouched() {
        let transport = MemoryTransport::new();
        let mut session = session_with(&transport, &Cache::in_memory());
        session.add_to_cart(&rose(), 1).unwrap();

        let err = session.update_quantity(&rose().id, 100).unwrap_err();
        assert!(matches!(
            err,
            StorefrontError::Commerce(CommerceError::QuantityExceedsLimit(100, 99))
        ));
        assert_eq!(session.cart().quantity_of(&rose().id), 1);

        assert!(session.apply_coupon("NOPE").is_err());
        assert!(session.cart().coupon.is_none());
    }

    #[test]
    fn test_rejected_sync_rolls_back() {
        let transport = MemoryTransport::new();
        let cache = Cache::in_memory();
        let mut session = session_with(&transport, &cache);
        transport
            .respond_json(Method::Get, "/api/cart", 200, &json!({"items": []}))
            .unwrap();
        transport
            .respond_json(Method::Put, "/api/cart", 200, &json!({}))
            .unwrap();
        sign_in(&mut session, &transport);
        session.add_to_cart(&rose(), 1).unwrap();

        transport.reset();
        transport.respond(
            Method::Put,
            "/api/cart",
            Response::json_body(409, &json!({"message": "Item unavailable"})).unwrap(),
        );
        let err = session.add_to_cart(&lily(), 1).unwrap_err();
        assert_eq!(err.to_string(), "Item unavailable");
        assert!(!session.cart().is_in_cart(&lily().id));
        assert_eq!(session.cart().quantity_of(&rose().id), 1);

        let reopened = session_with(&transport, &cache);
        assert!(!reopened.cart().is_in_cart(&lily().id));
    }

    #[test]
    fn test_sign_in_merges_guest_cart() {
        let transport = MemoryTransport::new();
        let mut session = session_with(&transport, &Cache::in_memory());
        session.add_to_cart(&rose(), 2).unwrap();

        transport
            .respond_json(
                Method::Get,
                "/api/cart",
                200,
                &json!({"items": [{"productId": "rose-12", "name": "Red Rose Bouquet", "quantity": 1, "price": "1299.00"}]}),
            )
            .unwrap();
        transport
            .respond_json(Method::Put, "/api/cart", 200, &json!({}))
            .unwrap();
        sign_in(&mut session, &transport);

        assert!(session.is_signed_in());
        assert_eq!(session.cart().quantity_of(&rose().id), 3);
        assert_eq!(session.cart().user_id, Some(UserId::new("u1")));

        let pushed = transport.requests_to(Method::Put, "/api/cart");
        assert_eq!(pushed.len(), 1);
        let body: CartPayload = pushed[0].json().unwrap();
        assert_eq!(body.items[0].quantity, 3);
    }

    #[test]
    fn test_sign_in_survives_missing_server_cart() {
        let transport = MemoryTransport::new();
        let mut session = session_with(&transport, &Cache::in_memory());
        session.add_to_cart(&lily(), 1).unwrap();
        sign_in(&mut session, &transport);
        assert_eq!(session.cart().quantity_of(&lily().id), 1);
    }

    #[test]
    fn test_unreadable_server_cart_is_not_overwritten() {
        let transport = MemoryTransport::new();
        let mut session = session_with(&transport, &Cache::in_memory());
        session.add_to_cart(&lily(), 1).unwrap();

        transport.respond(Method::Get, "/api/cart", Response::empty(503));
        transport
            .respond_json(Method::Put, "/api/cart", 200, &json!({}))
            .unwrap();
        sign_in(&mut session, &transport);

        assert!(session.is_signed_in());
        assert_eq!(session.cart().quantity_of(&lily().id), 1);
        assert_eq!(session.cart().user_id, Some(UserId::new("u1")));
        assert!(transport.requests_to(Method::Put, "/api/cart").is_empty());

        // Still down: the change stays local.
        session.add_to_cart(&lily(), 1).unwrap();
        assert!(transport.requests_to(Method::Put, "/api/cart").is_empty());

        // Back up: the server cart is merged before the first push.
        transport.reset();
        transport
            .respond_json(
                Method::Get,
                "/api/cart",
                200,
                &json!({"items": [{"productId": "rose-12", "name": "Red Rose Bouquet", "quantity": 1, "price": "1299.00"}]}),
            )
            .unwrap();
        transport
            .respond_json(Method::Put, "/api/cart", 200, &json!({}))
            .unwrap();
        session.add_to_cart(&rose(), 1).unwrap();

        assert_eq!(session.cart().quantity_of(&rose().id), 2);
        assert_eq!(session.cart().quantity_of(&lily().id), 2);
        let pushed = transport.requests_to(Method::Put, "/api/cart");
        assert_eq!(pushed.len(), 1);
        let body: CartPayload = pushed[0].json().unwrap();
        assert_eq!(body.items.len(), 2);

        session.add_to_cart(&rose(), 1).unwrap();
        assert_eq!(transport.requests_to(Method::Get, "/api/cart").len(), 1);
    }

    #[test]
    fn test_sign_in_form_checked_before_request() {
        let transport = MemoryTransport::new();
        let mut session = session_with(&transport, &Cache::in_memory());
        let err = session.sign_in(&SignInForm::new("", "")).unwrap_err();
        assert_eq!(
            err.field_errors().and_then(|f| f.get("form")),
            Some("Please fill in all fields")
        );
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn test_totals_include_cod_fee_and_delivery() {
        let transport = MemoryTransport::new();
        let mut session = session_with(&transport, &Cache::in_memory());
        session.add_to_cart(&rose(), 1).unwrap();
        session
            .set_delivery_option(&DeliveryOptionId::new("express"))
            .unwrap();
        session
            .update_payment_data(PaymentDetails::CashOnDelivery(CodDetails { confirmed: true }))
            .unwrap();

        let totals = session.totals().unwrap();
        assert_eq!(totals.delivery_charge, Money::inr(199));
        assert_eq!(totals.payment_charge, Money::inr(50));
        assert_eq!(totals.final_amount, Money::inr(1548));

        session.set_payment_method(PaymentMethod::Upi).unwrap();
        assert!(session.totals().unwrap().payment_charge.is_zero());
    }

    #[test]
    fn test_unknown_delivery_option() {
        let transport = MemoryTransport::new();
        let mut session = session_with(&transport, &Cache::in_memory());
        let err = session
            .set_delivery_option(&DeliveryOptionId::new("drone"))
            .unwrap_err();
        assert!(matches!(
            err,
            StorefrontError::Commerce(CommerceError::UnknownDeliveryOption(_))
        ));
        assert!(session.delivery_option().is_none());
    }

    #[test]
    fn test_emptying_cart_resets_wizard() {
        let transport = MemoryTransport::new();
        let mut session = session_with(&transport, &Cache::in_memory());
        session.add_to_cart(&rose(), 1).unwrap();
        assert_eq!(session.advance().unwrap(), CheckoutStep::Shipping);

        session.remove_from_cart(&rose().id).unwrap();
        assert_eq!(session.current_step(), CheckoutStep::Cart);
        assert!(session.advance().is_err());
    }

    #[test]
    fn test_place_order_requires_review() {
        let transport = MemoryTransport::new();
        let mut session = session_with(&transport, &Cache::in_memory());

        match session.place_order().unwrap_err() {
            StorefrontError::Commerce(CommerceError::CheckoutIncomplete(missing)) => {
                assert_eq!(
                    missing,
                    vec![
                        "Cart is empty",
                        "Shipping address not selected",
                        "Delivery option not selected",
                        "Payment information incomplete",
                    ]
                );
            }
            other => panic!("unexpected: {:?}", other),
        }

        session.add_to_cart(&rose(), 1).unwrap();
        let address = session.add_address(address_form()).unwrap();
        session.select_address(&address.id).unwrap();
        session
            .set_delivery_option(&DeliveryOptionId::new("standard"))
            .unwrap();
        session
            .update_payment_data(PaymentDetails::Upi(UpiDetails::new("priya@okaxis")))
            .unwrap();
        assert!(session.review_errors().is_empty());
        assert!(!session.can_place_order());

        let err = session.place_order().unwrap_err();
        assert!(err.to_string().contains(CONSENT_REQUIRED));
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn test_failed_order_keeps_state() {
        let transport = MemoryTransport::new();
        let mut session = session_with(&transport, &Cache::in_memory());
        session.add_to_cart(&rose(), 1).unwrap();
        let address = session.add_address(address_form()).unwrap();
        session.set_shipping_address(address).unwrap();
        session
            .set_delivery_option(&DeliveryOptionId::new("standard"))
            .unwrap();
        session
            .update_payment_data(PaymentDetails::Upi(UpiDetails::new("priya@okaxis")))
            .unwrap();
        session.set_consent(ReviewConsent::all_given()).unwrap();
        assert!(session.can_place_order());

        transport.respond(
            Method::Post,
            "/api/orders",
            Response::json_body(500, &json!({"message": "Payment service down"})).unwrap(),
        );
        let err = session.place_order().unwrap_err();
        assert_eq!(err.to_string(), "Payment service down");
        assert!(!session.is_placing());
        assert_eq!(session.cart().quantity_of(&rose().id), 1);
        assert!(session.state().payment.selected_method.is_some());
        assert!(session.last_order().is_none());
    }

    #[test]
    fn test_coupon_from_config() {
        let transport = MemoryTransport::new();
        let api = StorefrontApi::new(transport.clone(), "http://localhost:5000");
        let config = StoreConfig::default()
            .with_coupon(Coupon::fixed("MONSOON", "₹100 off", Money::inr(100)));
        let mut session =
            StorefrontSession::open(SessionId::new("s"), config, api, Cache::in_memory()).unwrap();
        session.add_to_cart(&lily(), 1).unwrap();

        let applied = session.apply_coupon(" monsoon ").unwrap();
        assert_eq!(applied.code, "MONSOON");
        assert_eq!(session.totals().unwrap().discount, Money::inr(100));
        assert!(session.remove_coupon().unwrap());
    }

    #[test]
    fn test_coupon_dropped_when_minimum_no_longer_met() {
        let transport = MemoryTransport::new();
        let api = StorefrontApi::new(transport.clone(), "http://localhost:5000");
        let config = StoreConfig::default().with_coupon(
            Coupon::fixed("BLOOM200", "₹200 off", Money::inr(200)).with_min_order(Money::inr(2000)),
        );
        let mut session =
            StorefrontSession::open(SessionId::new("s"), config, api, Cache::in_memory()).unwrap();
        session.add_to_cart(&rose(), 2).unwrap();
        session.apply_coupon("BLOOM200").unwrap();
        assert_eq!(session.totals().unwrap().discount, Money::inr(200));

        session.update_quantity(&rose().id, 1).unwrap();
        assert!(session.cart().coupon.is_none());
        assert_eq!(session.totals().unwrap().discount, Money::zero(Currency::INR));

        session.add_to_cart(&lily(), 1).unwrap();
        assert!(session.cart().coupon.is_none());
    }

    #[test]
    fn test_refresh_user_drops_rejected_token() {
        let transport = MemoryTransport::new();
        let cache = Cache::in_memory();
        let mut session = session_with(&transport, &cache);
        sign_in(&mut session, &transport);

        transport.respond(Method::Get, "/api/auth/user", Response::empty(401));
        assert!(matches!(
            session.refresh_user(),
            Err(StorefrontError::NotSignedIn)
        ));
        assert!(!session.is_signed_in());
        assert!(!session_with(&transport, &cache).is_signed_in());
    }

    #[test]
    fn test_sign_out_tears_down() {
        let transport = MemoryTransport::new();
        let cache = Cache::in_memory();
        let mut session = session_with(&transport, &cache);
        sign_in(&mut session, &transport);
        transport
            .respond_json(Method::Put, "/api/cart", 200, &json!({}))
            .unwrap();
        session.add_to_cart(&rose(), 1).unwrap();

        session.sign_out().unwrap();
        assert!(!session.is_signed_in());
        assert!(session.cart().is_empty());
        assert_eq!(transport.requests_to(Method::Post, "/api/auth/signout").len(), 1);

        let reopened = session_with(&transport, &cache);
        assert!(!reopened.is_signed_in());
        assert!(reopened.cart().is_empty());
        assert!(session.order_history().is_err());
    }
}
