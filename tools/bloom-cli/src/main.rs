//! Bouquet CLI - operator tool for the Bouquet Bar storefront.
//!
//! Commands:
//! - `bouquet quote` - Price a cart file with coupon, delivery and payment method
//! - `bouquet payment validate` - Check simulated payment details
//! - `bouquet address validate` - Check an address form
//! - `bouquet checkout` - Walk through checkout and preview the order payload
//! - `bouquet track` - Render a tracking response
//! - `bouquet config` - Manage store configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{AddressArgs, CheckoutArgs, ConfigArgs, PaymentArgs, QuoteArgs, TrackArgs};

/// Bouquet CLI - Quote carts, check checkout input and render orders
#[derive(Parser)]
#[command(name = "bouquet")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a cart
    Quote(QuoteArgs),

    /// Validate payment details
    Payment(PaymentArgs),

    /// Validate a delivery address
    Address(AddressArgs),

    /// Interactive checkout that previews the order payload
    Checkout(CheckoutArgs),

    /// Render order tracking
    Track(TrackArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let config_path = cli.config.as_deref();
    let ctx = context::Context::load(config_path, output)?;

    // Execute command
    let result = match cli.command {
        Commands::Quote(args) => commands::quote::run(args, &ctx).await,
        Commands::Payment(args) => commands::payment::run(args, &ctx).await,
        Commands::Address(args) => commands::address::run(args, &ctx).await,
        Commands::Checkout(args) => commands::checkout::run(args, &ctx).await,
        Commands::Track(args) => commands::track::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
