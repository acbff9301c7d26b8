//! CLI command implementations.

pub mod address;
pub mod checkout;
pub mod config;
pub mod payment;
pub mod quote;
pub mod track;

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use serde::de::DeserializeOwned;

use crate::context::Context;

/// Read and parse a JSON input file.
pub async fn read_json<T: DeserializeOwned>(ctx: &Context, path: &str) -> Result<T> {
    let path = ctx.resolve_path(path);
    tracing::debug!(path = %path.display(), "reading input file");
    let content = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Arguments for the quote command.
#[derive(Args)]
pub struct QuoteArgs {
    /// Cart file, in the `/api/cart` JSON shape.
    pub cart: String,

    /// Coupon code to apply.
    #[arg(long)]
    pub coupon: Option<String>,

    /// Delivery option id (standard, express, same-day).
    #[arg(short, long)]
    pub delivery: Option<String>,

    /// Payment method (card, upi, netbanking, cod, qrcode).
    #[arg(short, long)]
    pub payment: Option<String>,
}

/// Arguments for the payment command.
#[derive(Args)]
pub struct PaymentArgs {
    #[command(subcommand)]
    pub command: PaymentCommand,
}

#[derive(Subcommand)]
pub enum PaymentCommand {
    /// Validate payment details from a file.
    Validate {
        /// Details file, `{"method": "...", "data": {...}}`.
        file: String,

        /// Order total the QR code amount must match, e.g. 1299.00.
        #[arg(long)]
        total: Option<String>,

        /// Date for card expiry checks (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        today: Option<String>,
    },
    /// List payment methods and their surcharges.
    Methods,
    /// Print the UPI payment link for an amount.
    Link {
        /// Amount, e.g. 1299.00.
        amount: String,
    },
}

/// Arguments for the address command.
#[derive(Args)]
pub struct AddressArgs {
    #[command(subcommand)]
    pub command: AddressCommand,
}

#[derive(Subcommand)]
pub enum AddressCommand {
    /// Validate an address form from a file.
    Validate {
        /// Address form file (camelCase fields).
        file: String,
    },
}

/// Arguments for the checkout command.
#[derive(Args)]
pub struct CheckoutArgs {
    /// Cart file, in the `/api/cart` JSON shape.
    pub cart: String,

    /// Address form file. Prompted for when omitted.
    #[arg(short, long)]
    pub address: Option<String>,

    /// Payment details file. Prompted for when omitted.
    #[arg(short, long)]
    pub payment: Option<String>,

    /// Delivery option id. Prompted for when omitted.
    #[arg(short, long)]
    pub delivery: Option<String>,

    /// Coupon code to apply.
    #[arg(long)]
    pub coupon: Option<String>,

    /// Accept terms and privacy policy without asking.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the track command.
#[derive(Args)]
pub struct TrackArgs {
    /// Tracking file, as served by `/api/orders/{id}/tracking`.
    pub file: String,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,

        /// Write bouquet.json instead of bouquet.toml.
        #[arg(long = "as-json")]
        as_json: bool,
    },
    /// Validate the config file.
    Validate,
}
