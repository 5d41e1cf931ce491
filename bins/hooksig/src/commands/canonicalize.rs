//! Print the canonical record for a payload

use anyhow::Result;
use hooksig_crypto::canonicalize_json;

use super::Context;
use crate::error::CliError;
use crate::input::payload_text;
use crate::output::{print_json, OutputFormat};

/// Run the canonicalize command
pub fn run(ctx: &Context, payload: &str, timestamp: &str) -> Result<()> {
    let json = payload_text(payload)?;
    let record = canonicalize_json(&json, timestamp, ctx.order).map_err(CliError::from)?;

    match ctx.format {
        OutputFormat::Text => println!("{record}"),
        OutputFormat::Json => print_json(&serde_json::json!({
            "mode": ctx.order,
            "record": record,
        }))?,
    }

    Ok(())
}
