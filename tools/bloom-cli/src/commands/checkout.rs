//! Walk a cart through the checkout wizard and preview the order payload.
//!
//! The order is placed against an in-memory API, so nothing leaves the
//! machine. The body that would be posted to `/api/orders` is printed.

use anyhow::{anyhow, bail, Context as _, Result};
use bloom_cache::{Cache, MemoryStore};
use bloom_commerce::catalog::Product;
use bloom_commerce::checkout::{AddressForm, CheckoutStep, DeliveryOption, ReviewConsent};
use bloom_commerce::payment::{
    AccountType, CardDetails, CodDetails, NetBankingDetails, PaymentDetails, PaymentMethod,
    QrCodeDetails, UpiDetails, SUPPORTED_BANKS,
};
use bloom_commerce::DeliveryOptionId;
use bloom_data::{MemoryTransport, Method};
use bloom_storefront::{CartPayload, StoreConfig, StorefrontApi, StorefrontSession};
use dialoguer::{Confirm, Input, Password, Select};
use serde_json::{json, Value};

use super::quote::{find_delivery, load_cart};
use super::{read_json, CheckoutArgs};
use crate::context::Context;

type PreviewSession = StorefrontSession<MemoryStore, MemoryTransport>;

const PREVIEW_ORDER_NUMBER: &str = "PREVIEW";

/// Run the checkout command.
pub async fn run(args: CheckoutArgs, ctx: &Context) -> Result<()> {
    let payload: CartPayload = read_json(ctx, &args.cart).await?;
    let address_form: Option<AddressForm> = match &args.address {
        Some(path) => Some(read_json(ctx, path).await?),
        None => None,
    };
    let payment_details: Option<PaymentDetails> = match &args.payment {
        Some(path) => Some(read_json(ctx, path).await?),
        None => None,
    };

    let transport = MemoryTransport::new();
    transport.respond_json(
        Method::Post,
        "/api/orders",
        201,
        &json!({ "id": "preview", "orderNumber": PREVIEW_ORDER_NUMBER }),
    )?;
    let config = ctx.config.clone().with_cart_sync(false);
    let api = StorefrontApi::new(transport.clone(), config.api_base_url.clone());
    let mut session = StorefrontSession::start(config, api, Cache::in_memory())?;

    // Step 1: Cart
    ctx.output.step(1, 4, "Cart");
    fill_cart(&mut session, payload, ctx)?;
    if let Some(code) = &args.coupon {
        let applied = session.apply_coupon(code)?;
        ctx.output.success(&format!("Applied {}: {}", applied.code, applied.description));
    }
    session.advance()?;

    // Step 2: Shipping
    ctx.output.step(2, 4, "Shipping");
    let form = match address_form {
        Some(form) => form,
        None => prompt_address(ctx)?,
    };
    let address = session.add_address(form)?;
    session.select_address(&address.id)?;
    let delivery_id = match &args.delivery {
        Some(id) => find_delivery(session.config(), id)?.id.clone(),
        None => prompt_delivery(session.config(), ctx)?,
    };
    session.set_delivery_option(&delivery_id)?;
    session.advance()?;

    // Step 3: Payment
    ctx.output.step(3, 4, "Payment");
    let details = match payment_details {
        Some(details) => details,
        None => prompt_payment(&mut session, ctx)?,
    };
    session.update_payment_data(details)?;
    if let Err(e) = session.validate_payment() {
        for message in payment_messages(&e) {
            ctx.output.list_item(&message);
        }
        return Err(e).context("Payment details are invalid");
    }
    session.advance()?;

    // Step 4: Review
    ctx.output.step(4, 4, "Review");
    show_review(&session, ctx)?;
    let consent = if args.yes {
        ReviewConsent::all_given()
    } else {
        prompt_consent(ctx)?
    };
    session.set_consent(consent)?;
    if session.current_step() != CheckoutStep::Review || !session.can_place_order() {
        bail!("Order not placed: {}", session.review_errors().join(", "));
    }

    tracing::info!(
        items = session.cart().item_count(),
        method = ?session.state().payment.selected_method,
        "placing preview order"
    );
    let spinner = ctx.output.spinner("Placing order...");
    let placed = session.place_order();
    spinner.finish_and_clear();
    let placed = placed?;

    let body: Value = transport
        .requests_to(Method::Post, "/api/orders")
        .last()
        .ok_or_else(|| anyhow!("No order request was sent"))?
        .json()?;
    tracing::debug!(order_number = %placed.order_number, "preview order captured");

    if ctx.output.is_json() {
        ctx.output.json(&body);
    } else {
        ctx.output.success(&format!("Order {} ready to submit", placed.order_number));
        ctx.output.header("Order payload");
        println!("{}", serde_json::to_string_pretty(&body)?);
    }
    Ok(())
}

fn fill_cart(session: &mut PreviewSession, payload: CartPayload, ctx: &Context) -> Result<()> {
    let cart = load_cart(payload, session.config())?;
    for item in &cart.items {
        let product = Product::new(item.product_id.clone(), item.name.clone(), item.unit_price);
        session.add_to_cart(&product, item.quantity)?;
        ctx.output.list_item(&format!("{} × {}", item.quantity, item.name));
    }
    Ok(())
}

fn require_terminal(ctx: &Context, flag: &str) -> Result<()> {
    if !ctx.output.is_interactive() {
        bail!("Not running in a terminal; pass {} instead", flag);
    }
    Ok(())
}

fn prompt_address(ctx: &Context) -> Result<AddressForm> {
    require_terminal(ctx, "--address <file>")?;

    let ask = |prompt: &str, optional: bool| -> Result<String> {
        Ok(Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(optional)
            .interact_text()?)
    };

    let form = AddressForm {
        full_name: ask("Full name", false)?,
        phone: ask("Mobile number", false)?,
        email: ask("Email (optional)", true)?,
        address_line1: ask("Address line 1", false)?,
        address_line2: ask("Address line 2 (optional)", true)?,
        landmark: ask("Landmark (optional)", true)?,
        city: ask("City", false)?,
        state: ask("State", false)?,
        postal_code: ask("PIN code", false)?,
        ..AddressForm::default()
    };

    if let Err(errors) = form.validate() {
        for (field, message) in errors.iter() {
            ctx.output.kv(field, message);
        }
        bail!("Address is invalid");
    }
    Ok(form)
}

fn prompt_delivery(config: &StoreConfig, ctx: &Context) -> Result<DeliveryOptionId> {
    require_terminal(ctx, "--delivery <id>")?;

    let items: Vec<String> = config
        .delivery_options
        .iter()
        .map(|o| format!("{} - {} ({})", o.name, o.price.display(), delivery_note(o)))
        .collect();
    let selection = Select::new()
        .with_prompt("Delivery option")
        .items(&items)
        .default(0)
        .interact()?;

    config
        .delivery_options
        .get(selection)
        .map(|o| o.id.clone())
        .ok_or_else(|| anyhow!("No delivery options configured"))
}

fn delivery_note(option: &DeliveryOption) -> String {
    if option.description.is_empty() {
        format!("{} days", option.estimate_label())
    } else {
        option.description.clone()
    }
}

fn prompt_payment(session: &mut PreviewSession, ctx: &Context) -> Result<PaymentDetails> {
    require_terminal(ctx, "--payment <file>")?;

    let items: Vec<&str> = PaymentMethod::ALL.iter().map(|m| m.title()).collect();
    let selection = Select::new()
        .with_prompt("Payment method")
        .items(&items)
        .default(0)
        .interact()?;
    let method = PaymentMethod::ALL[selection];
    session.set_payment_method(method)?;

    let details = match method {
        PaymentMethod::Card => PaymentDetails::Card(CardDetails {
            holder_name: Input::new().with_prompt("Name on card").interact_text()?,
            number: Input::new().with_prompt("Card number").interact_text()?,
            expiry_month: Input::new().with_prompt("Expiry month (MM)").interact_text()?,
            expiry_year: Input::new().with_prompt("Expiry year (YY)").interact_text()?,
            cvv: Password::new().with_prompt("CVV").interact()?,
        }),
        PaymentMethod::Upi => PaymentDetails::Upi(UpiDetails::new(
            Input::<String>::new().with_prompt("UPI ID").interact_text()?,
        )),
        PaymentMethod::NetBanking => {
            let banks: Vec<&str> = SUPPORTED_BANKS.iter().map(|(_, name)| *name).collect();
            let bank = Select::new()
                .with_prompt("Bank")
                .items(&banks)
                .default(0)
                .interact()?;
            let account = Select::new()
                .with_prompt("Account type")
                .items(&["Savings", "Current"])
                .default(0)
                .interact()?;
            let account_type = if account == 0 {
                AccountType::Savings
            } else {
                AccountType::Current
            };
            PaymentDetails::NetBanking(NetBankingDetails::new(
                SUPPORTED_BANKS[bank].0,
                account_type,
            ))
        }
        PaymentMethod::CashOnDelivery => {
            let total = session.totals()?.final_amount;
            let confirmed = Confirm::new()
                .with_prompt(format!("Pay {} in cash on delivery?", total.display()))
                .default(true)
                .interact()?;
            PaymentDetails::CashOnDelivery(CodDetails { confirmed })
        }
        PaymentMethod::QrCode => {
            let total = session.totals()?.final_amount;
            ctx.output.info("Scan to pay:");
            println!("  {}", session.upi_payment_uri()?);
            let confirmed = Confirm::new()
                .with_prompt(format!("Has {} been paid?", total.display()))
                .default(false)
                .interact()?;
            PaymentDetails::QrCode(QrCodeDetails::new(total, confirmed))
        }
    };
    Ok(details)
}

fn payment_messages(error: &bloom_storefront::StorefrontError) -> Vec<String> {
    match error {
        bloom_storefront::StorefrontError::Payment(e) => e.messages(),
        other => vec![other.to_string()],
    }
}

fn show_review(session: &PreviewSession, ctx: &Context) -> Result<()> {
    let state = session.state();
    if let Some(address) = &state.shipping_address {
        ctx.output.kv("ship to", &address.formatted());
    }
    if let Some(option) = session.delivery_option() {
        ctx.output.kv("delivery", &format!("{} ({})", option.name, delivery_note(option)));
    }
    ctx.output.kv("payment", &state.payment.masked_summary());
    println!();

    let coupon = session.cart().coupon.as_ref().map(|c| c.code.as_str());
    ctx.output.price_rows(&session.totals()?.rows(coupon));
    println!();
    Ok(())
}

fn prompt_consent(ctx: &Context) -> Result<ReviewConsent> {
    require_terminal(ctx, "--yes")?;

    let ask = |prompt: &str| -> Result<bool> {
        Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
    };
    Ok(ReviewConsent {
        accept_terms: ask("I accept the terms and conditions")?,
        accept_privacy: ask("I accept the privacy policy")?,
        confirm_order: ask("Place this order?")?,
    })
}
