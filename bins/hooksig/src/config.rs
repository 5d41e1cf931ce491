//! Configuration file loading
//!
//! Looks for `--config`, then `.hooksig.toml`, `hooksig.toml` and
//! `.config/hooksig.toml` in the working directory, then falls back to
//! defaults. Every table is optional.

use std::path::{Path, PathBuf};

use hooksig_crypto::{Canonicalization, Secret};
use hooksig_telemetry::TelemetryConfig;
use serde::{Deserialize, Serialize};

use crate::error::CliError;

/// Environment variable holding the secret unless configured otherwise
pub const DEFAULT_SECRET_ENV: &str = "HOOKSIG_SECRET";

const CANDIDATES: [&str; 3] = [".hooksig.toml", "hooksig.toml", ".config/hooksig.toml"];

/// Root configuration schema
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigSchema {
    pub secret: SecretConfig,
    pub canonical: CanonicalConfig,
    pub logging: TelemetryConfig,
}

/// Where the signing secret comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SecretConfig {
    /// Name of the environment variable holding the secret
    pub env: String,
}

impl Default for SecretConfig {
    fn default() -> Self {
        Self {
            env: DEFAULT_SECRET_ENV.to_string(),
        }
    }
}

/// Canonical record settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CanonicalConfig {
    /// Key order of the signed record
    pub order: Canonicalization,
}

/// Loaded configuration and where it came from
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub schema: ConfigSchema,
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load from an explicit path, a discovered file, or defaults
    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        Self::load_from(path, Path::new("."))
    }

    fn load_from(path: Option<&Path>, base: &Path) -> Result<Self, CliError> {
        let config_path = match path {
            Some(p) if !p.exists() => {
                return Err(CliError::Config(format!(
                    "config file not found: {}",
                    p.display()
                )));
            }
            Some(p) => Some(p.to_path_buf()),
            None => find_config_file(base),
        };

        let schema = match &config_path {
            Some(p) => load_config_file(p)?,
            None => ConfigSchema::default(),
        };

        Ok(Self {
            schema,
            path: config_path,
        })
    }

    /// Read the secret from the configured environment variable
    ///
    /// `override_env` replaces the configured variable name.
    pub fn secret(&self, override_env: Option<&str>) -> Result<Secret, CliError> {
        let name = override_env.unwrap_or(&self.schema.secret.env);
        let value = std::env::var(name).map_err(|_| {
            CliError::Config(format!("environment variable {name} is not set or not UTF-8"))
        })?;
        if value.is_empty() {
            tracing::warn!(env = name, "Signing secret is empty");
        }
        Ok(Secret::from(value))
    }
}

/// Find configuration file in standard locations
fn find_config_file(base: &Path) -> Option<PathBuf> {
    CANDIDATES
        .iter()
        .map(|candidate| base.join(candidate))
        .find(|candidate| candidate.is_file())
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &Path) -> Result<ConfigSchema, CliError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        CliError::Config(format!("failed to read config file {}: {}", path.display(), e))
    })?;

    toml::from_str(&content).map_err(|e| {
        CliError::Config(format!("failed to parse config file {}: {}", path.display(), e))
    })
}
