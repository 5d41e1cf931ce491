//! CLI command implementations

pub mod canonicalize;
pub mod sign;
pub mod verify;

use hooksig_crypto::{Canonicalization, Secret};

use crate::config::Config;
use crate::error::CliError;
use crate::output::OutputFormat;

/// Settings shared by every command after flags and config are merged
pub struct Context {
    pub config: Config,
    pub format: OutputFormat,
    pub order: Canonicalization,
    pub secret_env: Option<String>,
}

impl Context {
    /// Secret from the environment, never echoed
    pub fn secret(&self) -> Result<Secret, CliError> {
        self.config.secret(self.secret_env.as_deref())
    }
}
