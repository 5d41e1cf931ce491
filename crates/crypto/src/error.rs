//! Error types for the crypto crate.

use thiserror::Error;

/// Result type alias for crypto operations.
pub type Result<T> = std::result::Result<T, CryptoError>;

/// Errors that can occur during crypto operations.
///
/// Authentication failures have exactly one variant. Nothing here tells a
/// caller whether a rejected signature was malformed, truncated or simply wrong.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Signature verification failed
    #[error("Signature mismatch")]
    SignatureMismatch,

    /// Payload is not a JSON object of string values
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error code for programmatic handling by callers.
/// Range: 11xxx for crypto errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CryptoErrorCode {
    /// Signature verification failed
    SignatureMismatch = 11001,
    /// Payload is not a JSON object of string values
    InvalidPayload = 11002,
}

impl CryptoError {
    /// Returns the error code for this error.
    pub fn code(&self) -> CryptoErrorCode {
        match self {
            CryptoError::SignatureMismatch => CryptoErrorCode::SignatureMismatch,
            CryptoError::Json(_) => CryptoErrorCode::InvalidPayload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(CryptoError::SignatureMismatch.code() as u32, 11001);
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(CryptoError::from(err).code(), CryptoErrorCode::InvalidPayload);
    }

    #[test]
    fn test_mismatch_message_is_opaque() {
        assert_eq!(CryptoError::SignatureMismatch.to_string(), "Signature mismatch");
    }
}
