//! hooksig: sign and verify webhook payloads.
//!
//! The shared secret is read from an environment variable (`HOOKSIG_SECRET`
//! unless configured otherwise) and is never printed.

use clap::{Parser, Subcommand, ValueEnum};
use hooksig_crypto::Canonicalization;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod config;
mod error;
mod input;
mod output;

use commands::{canonicalize, sign, verify, Context};
use config::Config;
use error::{exit_code_for, exit_codes, CliError};
use output::{OutputFormat, Status};

/// Webhook signing and verification CLI
#[derive(Parser)]
#[command(name = "hooksig")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to a config file (default: .hooksig.toml, hooksig.toml, .config/hooksig.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print outcome counters to stderr when done
    #[arg(long, global = true)]
    stats: bool,

    /// Environment variable holding the secret (overrides config)
    #[arg(long, global = true, value_name = "NAME")]
    secret_env: Option<String>,

    /// Key order of the signed record (overrides config)
    #[arg(long, global = true, value_enum)]
    order: Option<OrderArg>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign raw data exactly as given
    Sign {
        /// Data to sign
        data: Option<String>,

        /// Read data from a file (`-` for stdin)
        #[arg(long, conflicts_with = "data")]
        file: Option<PathBuf>,
    },

    /// Print the canonical record that gets signed
    Canonicalize {
        /// JSON object of strings, `@path` or `-` for stdin
        #[arg(short, long)]
        payload: String,

        /// Timestamp folded into the record
        #[arg(short, long)]
        timestamp: String,
    },

    /// Canonicalize a payload and sign it
    SignPayload {
        /// JSON object of strings, `@path` or `-` for stdin
        #[arg(short, long)]
        payload: String,

        /// Timestamp folded into the record
        #[arg(short, long)]
        timestamp: String,
    },

    /// Verify a payload signature (exit code 1 when invalid)
    Verify {
        /// JSON object of strings, `@path` or `-` for stdin
        #[arg(short, long)]
        payload: String,

        /// Timestamp from the request
        #[arg(short, long)]
        timestamp: String,

        /// Hex signature from the request
        #[arg(short, long)]
        signature: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OrderArg {
    /// Keys sorted byte-wise
    Sorted,
    /// Keys in payload order, timestamp last
    Insertion,
}

impl From<OrderArg> for Canonicalization {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Sorted => Canonicalization::SortedKeys,
            OrderArg::Insertion => Canonicalization::InsertionOrder,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            Status::error(&format!("{err:#}"));
            ExitCode::from(exit_code_for(&err))
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<u8> {
    let config = Config::load(cli.config.as_deref())?;

    let mut logging = config.schema.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    hooksig_telemetry::init_with_config(logging)
        .map_err(|e| CliError::Config(format!("{e:#}")))?;
    tracing::debug!(config = ?config.path, "Configuration loaded");

    let ctx = Context {
        order: cli.order.map(Into::into).unwrap_or(config.schema.canonical.order),
        format: cli.format,
        secret_env: cli.secret_env,
        config,
    };

    let code = match cli.command {
        Commands::Sign { data, file } => {
            sign::run_raw(&ctx, data, file.as_deref())?;
            exit_codes::SUCCESS
        }
        Commands::Canonicalize { payload, timestamp } => {
            canonicalize::run(&ctx, &payload, &timestamp)?;
            exit_codes::SUCCESS
        }
        Commands::SignPayload { payload, timestamp } => {
            sign::run_payload(&ctx, &payload, &timestamp)?;
            exit_codes::SUCCESS
        }
        Commands::Verify { payload, timestamp, signature } => {
            if verify::run(&ctx, &payload, &timestamp, &signature)? {
                exit_codes::SUCCESS
            } else {
                exit_codes::INVALID_SIGNATURE
            }
        }
    };

    if cli.stats {
        eprintln!("{}", hooksig_telemetry::counters().export_json());
    }

    Ok(code)
}
