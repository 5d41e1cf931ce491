//! Webhook signing and verification for Hooksig.
//!
//! This crate provides:
//! - HMAC-SHA256 signatures encoded as lowercase hex
//! - Canonical serialization of a payload merged with its timestamp
//! - Constant-time signature verification
//! - WASM bindings for browser and Deno receivers (`wasm` feature)
//!
//! Freshness of the timestamp, transport and key storage are the caller's job.
//!
//! # Example
//!
//! ```
//! use hooksig_crypto::{canonical_record, sign, verify, Payload};
//!
//! let mut payload = Payload::new();
//! payload.insert("event".into(), "charge.created".into());
//!
//! let signature = sign("s3cr3t", &canonical_record(&payload, "1700000000"));
//! assert_eq!(signature.len(), 64);
//! assert!(verify("s3cr3t", &payload, "1700000000", &signature));
//! ```

#![warn(missing_docs)]

mod canonical;
mod error;
mod hmac_impl;
mod secret;
mod signer;
mod timing;
mod verifier;

#[cfg(feature = "wasm")]
mod wasm;

pub use canonical::{
    canonical_record, canonical_record_ordered, canonicalize_json, parse_ordered_payload,
    parse_payload, Canonicalization, OrderedPayload, Payload, TIMESTAMP_KEY,
};
pub use error::{CryptoError, CryptoErrorCode, Result};
pub use hmac_impl::{hmac_sha256, HmacSha256, MacProvider};
pub use secret::Secret;
pub use signer::{sign, SignedRecord, Signer};
pub use timing::constant_time_compare;
pub use verifier::{verify, Verifier};

/// Length of a hex-encoded signature.
pub const SIGNATURE_HEX_LEN: usize = 64;
