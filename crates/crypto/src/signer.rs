//! Signature generation.

use serde::Serialize;

use crate::canonical::{
    canonical_record, canonical_record_ordered, canonicalize_json, Canonicalization,
    OrderedPayload, Payload,
};
use crate::hmac_impl::{hmac_sha256, HmacSha256, MacProvider};
use crate::Result;

/// Sign `data` with `secret`.
///
/// Returns the lowercase hex HMAC-SHA256 digest, always 64 characters.
/// Deterministic; an empty secret or empty data is accepted.
///
/// ```
/// let record = r#"{"event":"charge.created","timestamp":"1700000000"}"#;
/// let sig = hooksig_crypto::sign("s3cr3t", record);
/// assert_eq!(sig, "3e0f2fb9a77e5428a02821a7cdbd073da74ce1e43bc304d7907421fc41a81fdd");
/// ```
pub fn sign(secret: &str, data: &str) -> String {
    hmac_sha256(secret.as_bytes(), data.as_bytes())
}

/// Canonical record together with its signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignedRecord {
    /// Exact string that was signed
    pub record: String,
    /// Hex HMAC-SHA256 of `record`
    pub signature: String,
}

/// Signs raw data and canonical payload records with a pluggable MAC.
#[derive(Debug, Clone, Copy, Default)]
pub struct Signer<M = HmacSha256> {
    mac: M,
    mode: Canonicalization,
}

impl Signer {
    /// Signer backed by the built-in HMAC-SHA256, sorted-key records.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<M: MacProvider> Signer<M> {
    /// Signer using a caller-supplied MAC implementation.
    pub fn with_provider(mac: M) -> Self {
        Self {
            mac,
            mode: Canonicalization::default(),
        }
    }

    /// Set the key order used by [`Signer::sign_json`].
    pub fn canonicalization(mut self, mode: Canonicalization) -> Self {
        self.mode = mode;
        self
    }

    /// Key order used for JSON payloads.
    pub fn mode(&self) -> Canonicalization {
        self.mode
    }

    /// Sign arbitrary bytes.
    pub fn sign(&self, secret: impl AsRef<[u8]>, data: impl AsRef<[u8]>) -> String {
        self.mac.hmac_sha256_hex(secret.as_ref(), data.as_ref())
    }

    /// Canonicalize `payload` with `timestamp` (sorted keys) and sign the record.
    ///
    /// A `timestamp` key inside `payload` is replaced by `timestamp`.
    pub fn sign_payload(
        &self,
        secret: impl AsRef<[u8]>,
        payload: &Payload,
        timestamp: &str,
    ) -> SignedRecord {
        self.sign_record(secret, canonical_record(payload, timestamp))
    }

    /// Canonicalize in insertion order and sign the record.
    ///
    /// A `timestamp` key inside `payload` keeps its position and takes `timestamp`.
    pub fn sign_ordered(
        &self,
        secret: impl AsRef<[u8]>,
        payload: &OrderedPayload,
        timestamp: &str,
    ) -> SignedRecord {
        self.sign_record(secret, canonical_record_ordered(payload, timestamp))
    }

    /// Parse a JSON payload, canonicalize it with the configured key order and sign it.
    pub fn sign_json(
        &self,
        secret: impl AsRef<[u8]>,
        payload_json: &str,
        timestamp: &str,
    ) -> Result<SignedRecord> {
        let record = canonicalize_json(payload_json, timestamp, self.mode)?;
        Ok(self.sign_record(secret, record))
    }

    fn sign_record(&self, secret: impl AsRef<[u8]>, record: String) -> SignedRecord {
        let signature = self.sign(secret, &record);
        SignedRecord { record, signature }
    }
}
