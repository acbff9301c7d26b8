//! Configuration management commands.

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config;
use crate::context::{find_config_file, Context};

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force, as_json } => init_config(force, as_json, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    let cfg = &ctx.config;
    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    ctx.output.info("");
    ctx.output.info("[store]");
    ctx.output.kv("store_name", &cfg.store_name);
    ctx.output.kv("currency", cfg.currency.code());
    ctx.output.kv("api_base_url", &cfg.api_base_url);
    ctx.output.kv("geocoder_url", &cfg.geocoder_url);
    ctx.output.kv("sync_cart", &cfg.sync_cart.to_string());
    ctx.output.kv("cod_fee", &cfg.cod_fee.display());
    ctx.output.kv("upi_payee", &format!("{} ({})", cfg.upi_payee.address, cfg.upi_payee.name));

    ctx.output.info("");
    ctx.output.info("Delivery options:");
    for option in &cfg.delivery_options {
        ctx.output.list_item(&format!(
            "{:<10} {} - {} ({})",
            option.id,
            option.name,
            option.price.display(),
            option.estimate_label()
        ));
    }

    ctx.output.info("");
    ctx.output.info("Coupons:");
    for coupon in &cfg.coupons {
        let state = if coupon.active { "" } else { " [inactive]" };
        ctx.output
            .list_item(&format!("{:<12} {}{}", coupon.code, coupon.description, state));
    }

    Ok(())
}

fn init_config(force: bool, as_json: bool, ctx: &Context) -> Result<()> {
    let name = if as_json { "bouquet.json" } else { "bouquet.toml" };
    let config_path = ctx.cwd.join(name);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }
    if let Some(existing) = find_config_file(&ctx.cwd).filter(|p| *p != config_path) {
        ctx.output.warn(&format!(
            "Another config file is also present: {}",
            existing.display()
        ));
    }

    config::save(&ctx.config, &config_path)?;
    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    if ctx.config_path.is_none() {
        ctx.output
            .warn("No config file found; validating built-in defaults. Run `bouquet config init` to create one.");
    }

    let problems = ctx.config.validate();
    if problems.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    ctx.output.header("Validating configuration");
    for problem in &problems {
        ctx.output.error(&format!("Error: {}", problem));
    }
    bail!("Configuration has {} error(s)", problems.len())
}
