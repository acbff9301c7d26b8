//! Address commands.

use anyhow::{bail, Result};
use bloom_commerce::checkout::AddressForm;
use bloom_commerce::AddressId;
use serde_json::json;

use super::{read_json, AddressArgs, AddressCommand};
use crate::context::Context;

/// Run the address command.
pub async fn run(args: AddressArgs, ctx: &Context) -> Result<()> {
    match args.command {
        AddressCommand::Validate { file } => validate(&file, ctx).await,
    }
}

async fn validate(file: &str, ctx: &Context) -> Result<()> {
    let form: AddressForm = read_json(ctx, file).await?;

    if let Err(errors) = form.validate() {
        if ctx.output.is_json() {
            let fields: serde_json::Map<String, serde_json::Value> = errors
                .iter()
                .map(|(field, msg)| (field.to_string(), json!(msg)))
                .collect();
            ctx.output.json(&json!({ "valid": false, "errors": fields }));
        } else {
            ctx.output.header("Address is invalid");
            for (field, message) in errors.iter() {
                ctx.output.kv(field, message);
            }
        }
        bail!("Address validation failed ({} field(s))", errors.len());
    }

    let address = form.into_address(AddressId::generate(), None)?;
    if ctx.output.is_json() {
        ctx.output.json(&json!({ "valid": true, "address": address.formatted() }));
    } else {
        ctx.output.success("Address is valid");
        ctx.output.info(&address.formatted());
    }
    Ok(())
}
