//! Telemetry for Hooksig tools
//!
//! This crate provides:
//! - Structured logging with tracing (compact text or JSON lines, on stderr)
//! - A per-process session ID for correlating log lines
//! - Counters for signing and verification outcomes
//!
//! Nothing here ever receives secrets or signatures; callers log outcomes only.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

/// Global outcome counters
static COUNTERS: Lazy<OutcomeCounters> = Lazy::new(OutcomeCounters::new);

/// Global session ID for correlating logs
static SESSION_ID: Lazy<String> = Lazy::new(|| Uuid::new_v4().to_string());

/// Initialize the telemetry system
pub fn init() -> anyhow::Result<()> {
    init_with_config(TelemetryConfig::default())
}

/// Initialize with custom configuration
///
/// `RUST_LOG` takes precedence over `config.level`. Calling this twice is an
/// error, not a panic.
pub fn init_with_config(config: TelemetryConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| anyhow::anyhow!("Invalid log level {:?}: {}", config.level, e))?;

    let (json_layer, text_layer) = if config.json {
        let layer = fmt::layer()
            .json()
            .with_target(config.show_target)
            .with_writer(std::io::stderr);
        (Some(layer), None)
    } else {
        let layer = fmt::layer()
            .compact()
            .with_target(config.show_target)
            .with_writer(std::io::stderr);
        (None, Some(layer))
    };

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer);

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))?;

    tracing::debug!(
        session_id = %session_id(),
        version = env!("CARGO_PKG_VERSION"),
        "Telemetry initialized"
    );

    Ok(())
}

/// Get the current session ID
pub fn session_id() -> &'static str {
    &SESSION_ID
}

/// Telemetry configuration
///
/// Doubles as the `[logging]` table of the CLI config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TelemetryConfig {
    /// Filter directive, e.g. `warn` or `hooksig_crypto=debug`
    pub level: String,
    /// Emit JSON lines instead of compact text
    pub json: bool,
    /// Include the event target in each line
    pub show_target: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
            show_target: false,
        }
    }
}

/// Counts of signing and verification outcomes in this process
pub struct OutcomeCounters {
    signed: AtomicU64,
    accepted: AtomicU64,
    rejected: AtomicU64,
    start_time: Instant,
}

impl OutcomeCounters {
    fn new() -> Self {
        Self {
            signed: AtomicU64::new(0),
            accepted: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record one produced signature
    pub fn record_signed(&self) {
        self.signed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one verification result
    pub fn record_verification(&self, accepted: bool) {
        let counter = if accepted { &self.accepted } else { &self.rejected };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of the counters
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            signed: self.signed.load(Ordering::Relaxed),
            accepted: self.accepted.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
        }
    }

    /// Milliseconds since the counters were created, saturating at `u64::MAX`
    pub fn uptime_ms(&self) -> u64 {
        u64::try_from(self.start_time.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    /// Export counters as JSON
    pub fn export_json(&self) -> serde_json::Value {
        serde_json::json!({
            "session_id": session_id(),
            "uptime_ms": self.uptime_ms(),
            "counters": self.snapshot(),
        })
    }
}

/// Counter values at one moment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CounterSnapshot {
    pub signed: u64,
    pub accepted: u64,
    pub rejected: u64,
}

/// Get the global outcome counters
pub fn counters() -> &'static OutcomeCounters {
    &COUNTERS
}
