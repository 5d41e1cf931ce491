//! CLI error classification and exit codes

use thiserror::Error;

/// Exit codes for CLI commands
pub mod exit_codes {
    pub const SUCCESS: u8 = 0;
    pub const INVALID_SIGNATURE: u8 = 1;
    pub const INPUT_ERROR: u8 = 2;
    pub const CONFIG_ERROR: u8 = 3;
}

/// Failures that are not a verification result
#[derive(Debug, Error)]
pub enum CliError {
    /// Config file or environment problem
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing or unreadable command input
    #[error("Input error: {0}")]
    Input(String),

    /// Payload text rejected by the parser
    #[error(transparent)]
    Payload(#[from] hooksig_crypto::CryptoError),
}

impl CliError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Config(_) => exit_codes::CONFIG_ERROR,
            CliError::Input(_) | CliError::Payload(_) => exit_codes::INPUT_ERROR,
        }
    }
}

/// Exit code for any error bubbling out of a command
pub fn exit_code_for(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<CliError>()
        .map(CliError::exit_code)
        .unwrap_or(exit_codes::INPUT_ERROR)
}
