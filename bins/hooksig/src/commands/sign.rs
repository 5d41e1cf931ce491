//! Signature generation commands

use std::path::Path;

use anyhow::Result;
use hooksig_crypto::Signer;
use hooksig_telemetry::counters;

use super::Context;
use crate::error::CliError;
use crate::input::{payload_text, raw_data};
use crate::output::{print_json, OutputFormat};

/// Sign raw data exactly as given
pub fn run_raw(ctx: &Context, data: Option<String>, file: Option<&Path>) -> Result<()> {
    let data = raw_data(data, file)?;
    let secret = ctx.secret()?;
    let signature = Signer::new().sign(&secret, &data);
    counters().record_signed();
    tracing::debug!(data_len = data.len(), "Signed raw data");

    match ctx.format {
        OutputFormat::Text => println!("{signature}"),
        OutputFormat::Json => print_json(&serde_json::json!({ "signature": signature }))?,
    }

    Ok(())
}

/// Canonicalize a payload with its timestamp and sign the record
pub fn run_payload(ctx: &Context, payload: &str, timestamp: &str) -> Result<()> {
    let json = payload_text(payload)?;
    let secret = ctx.secret()?;
    let signed = Signer::new()
        .canonicalization(ctx.order)
        .sign_json(&secret, &json, timestamp)
        .map_err(CliError::from)?;
    counters().record_signed();
    tracing::debug!(mode = %ctx.order, record_len = signed.record.len(), "Signed payload");

    match ctx.format {
        OutputFormat::Text => println!("{}", signed.signature),
        OutputFormat::Json => print_json(&serde_json::json!({
            "mode": ctx.order,
            "timestamp": timestamp,
            "record": signed.record,
            "signature": signed.signature,
        }))?,
    }

    Ok(())
}
