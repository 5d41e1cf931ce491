//! Signature verification command

use anyhow::Result;
use hooksig_crypto::Verifier;
use hooksig_telemetry::counters;

use super::Context;
use crate::error::CliError;
use crate::input::payload_text;
use crate::output::{print_json, OutputFormat, Status};

/// Run the verify command; `Ok(false)` means the signature did not match
pub fn run(ctx: &Context, payload: &str, timestamp: &str, signature: &str) -> Result<bool> {
    let json = payload_text(payload)?;
    let secret = ctx.secret()?;
    let valid = Verifier::new()
        .canonicalization(ctx.order)
        .verify_json(&secret, &json, timestamp, signature.trim())
        .map_err(CliError::from)?;
    counters().record_verification(valid);

    match ctx.format {
        OutputFormat::Text if valid => Status::success("Signature valid"),
        OutputFormat::Text => Status::error("Signature invalid"),
        OutputFormat::Json => print_json(&serde_json::json!({
            "mode": ctx.order,
            "valid": valid,
        }))?,
    }

    Ok(valid)
}
