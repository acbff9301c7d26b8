//! Payment commands.

use anyhow::{anyhow, bail, Context as _, Result};
use bloom_commerce::payment::{PaymentContext, PaymentDetails, PaymentMethod};
use bloom_commerce::Money;
use chrono::NaiveDate;
use serde_json::json;

use super::{read_json, PaymentArgs, PaymentCommand};
use crate::context::Context;

/// Run the payment command.
pub async fn run(args: PaymentArgs, ctx: &Context) -> Result<()> {
    match args.command {
        PaymentCommand::Validate { file, total, today } => {
            validate(&file, total.as_deref(), today.as_deref(), ctx).await
        }
        PaymentCommand::Methods => methods(ctx),
        PaymentCommand::Link { amount } => link(&amount, ctx),
    }
}

async fn validate(
    file: &str,
    total: Option<&str>,
    today: Option<&str>,
    ctx: &Context,
) -> Result<()> {
    let details: PaymentDetails = read_json(ctx, file).await?;
    let payment_ctx = PaymentContext {
        today: parse_date(today)?,
        order_total: match total {
            Some(amount) => parse_amount(amount, ctx)?,
            None => Money::zero(ctx.config.currency),
        },
    };

    let method = details.method();
    match details.validate(&payment_ctx) {
        Ok(()) => {
            if ctx.output.is_json() {
                ctx.output.json(&json!({
                    "valid": true,
                    "method": method.as_str(),
                    "summary": details.masked_summary(),
                }));
            } else {
                ctx.output
                    .success(&format!("{} details are valid", method.display_name()));
                ctx.output.kv("summary", &details.masked_summary());
            }
            Ok(())
        }
        Err(e) => {
            if ctx.output.is_json() {
                ctx.output.json(&json!({
                    "valid": false,
                    "method": method.as_str(),
                    "errors": e.messages(),
                }));
            } else {
                ctx.output
                    .header(&format!("{} details are invalid", method.display_name()));
                for message in e.messages() {
                    ctx.output.list_item(&message);
                }
            }
            bail!("Payment validation failed")
        }
    }
}

fn methods(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        let list: Vec<_> = PaymentMethod::ALL
            .iter()
            .map(|m| {
                json!({
                    "method": m.as_str(),
                    "title": m.title(),
                    "fee": m.fee(ctx.config.cod_fee).to_decimal_string(),
                })
            })
            .collect();
        ctx.output.json(&list);
        return Ok(());
    }

    ctx.output.header("Payment methods");
    for method in PaymentMethod::ALL {
        let fee = method.fee(ctx.config.cod_fee);
        let fee_note = if fee.is_zero() {
            String::new()
        } else {
            format!(" (+{})", fee.display())
        };
        ctx.output.list_item(&format!(
            "{:<10} {}{} - {}",
            method.as_str(),
            method.title(),
            fee_note,
            method.description()
        ));
    }
    Ok(())
}

fn link(amount: &str, ctx: &Context) -> Result<()> {
    let amount = parse_amount(amount, ctx)?;
    let uri = ctx.config.upi_payee.payment_uri(amount);
    if ctx.output.is_json() {
        ctx.output.json(&json!({ "uri": uri }));
    } else {
        println!("{}", uri);
    }
    Ok(())
}

/// Parse a decimal amount in the store currency.
pub fn parse_amount(input: &str, ctx: &Context) -> Result<Money> {
    Money::parse_decimal(input.trim(), ctx.config.currency)
        .ok_or_else(|| anyhow!("Invalid amount: {}", input))
}

fn parse_date(input: Option<&str>) -> Result<NaiveDate> {
    match input {
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .with_context(|| format!("Invalid date: {} (expected YYYY-MM-DD)", s)),
        None => Ok(chrono::Local::now().date_naive()),
    }
}
