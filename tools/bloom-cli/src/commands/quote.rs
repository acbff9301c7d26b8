//! Price a cart file.

use anyhow::{anyhow, Context as _, Result};
use bloom_commerce::cart::{find_coupon, Cart, PriceBreakdown};
use bloom_commerce::checkout::DeliveryOption;
use bloom_commerce::payment::PaymentMethod;
use bloom_commerce::{DeliveryOptionId, Money, UserId};
use bloom_storefront::{CartPayload, StoreConfig};
use serde_json::json;

use super::{read_json, QuoteArgs};
use crate::context::Context;

/// Run the quote command.
pub async fn run(args: QuoteArgs, ctx: &Context) -> Result<()> {
    let payload: CartPayload = read_json(ctx, &args.cart).await?;
    let mut cart = load_cart(payload, &ctx.config)?;

    if let Some(code) = args.coupon.as_deref() {
        let coupon = find_coupon(&ctx.config.coupons, code)?.clone();
        cart.apply_coupon(coupon)
            .with_context(|| format!("Coupon {} cannot be applied", code))?;
    }

    let delivery = args
        .delivery
        .as_deref()
        .map(|id| find_delivery(&ctx.config, id))
        .transpose()?;
    let method = args
        .payment
        .as_deref()
        .map(parse_method)
        .transpose()?;
    let payment_charge = method
        .map(|m| m.fee(ctx.config.cod_fee))
        .unwrap_or_else(|| Money::zero(ctx.config.currency));

    let pricing = PriceBreakdown::calculate(&cart, delivery, payment_charge)?;
    let coupon_code = cart.coupon.as_ref().map(|c| c.code.as_str());

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "items": cart.item_count(),
            "subtotal": pricing.subtotal.to_decimal_string(),
            "discount": pricing.discount.to_decimal_string(),
            "couponCode": coupon_code,
            "deliveryCharge": pricing.delivery_charge.to_decimal_string(),
            "paymentCharges": pricing.payment_charge.to_decimal_string(),
            "total": pricing.final_amount.to_decimal_string(),
        }));
        return Ok(());
    }

    ctx.output.header(&format!("Quote ({} items)", cart.item_count()));
    for item in &cart.items {
        ctx.output.list_item(&format!(
            "{} × {} @ {} = {}",
            item.quantity,
            item.name,
            item.unit_price.display(),
            item.total_price.display()
        ));
    }
    if let Some(option) = delivery {
        ctx.output.kv("delivery", &format!("{} ({})", option.name, option.estimate_label()));
    }
    if let Some(method) = method {
        ctx.output.kv("payment", method.display_name());
    }
    println!();
    ctx.output.price_rows(&pricing.rows(coupon_code));

    Ok(())
}

/// Rebuild a cart from its wire form with the store's coupons.
pub fn load_cart(payload: CartPayload, config: &StoreConfig) -> Result<Cart> {
    let cart = payload.into_cart(UserId::new("operator"), &config.coupons, config.currency)?;
    if cart.is_empty() {
        return Err(anyhow!("Cart is empty"));
    }
    Ok(cart)
}

pub fn find_delivery<'a>(config: &'a StoreConfig, id: &str) -> Result<&'a DeliveryOption> {
    config
        .delivery_option(&DeliveryOptionId::new(id))
        .ok_or_else(|| {
            let known: Vec<&str> = config
                .delivery_options
                .iter()
                .map(|o| o.id.as_str())
                .collect();
            anyhow!("Unknown delivery option: {}. Available: {}", id, known.join(", "))
        })
}

pub fn parse_method(input: &str) -> Result<PaymentMethod> {
    PaymentMethod::from_str(input).ok_or_else(|| {
        let known: Vec<&str> = PaymentMethod::ALL.iter().map(|m| m.as_str()).collect();
        anyhow!("Unknown payment method: {}. Available: {}", input, known.join(", "))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_cart_rejects_empty() {
        let config = StoreConfig::default();
        let payload: CartPayload =
            serde_json::from_str(r#"{"items": [{"productId": "p1", "name": "Tulips", "quantity": 0, "price": "499.00"}]}"#)
                .unwrap();
        assert!(load_cart(payload, &config).is_err());
    }

    #[test]
    fn test_lookup_errors_list_choices() {
        let config = StoreConfig::default();
        let err = find_delivery(&config, "drone").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown delivery option: drone. Available: standard, express, same-day"
        );
        assert_eq!(parse_method("COD").unwrap(), PaymentMethod::CashOnDelivery);
        assert!(parse_method("paypal").is_err());
    }
}
