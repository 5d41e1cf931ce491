//! Signature verification.
//!
//! The expected signature is recomputed with [`Signer`] and compared with
//! [`constant_time_compare`]. Every failure, whether wrong secret, tampered
//! payload or timestamp, or a truncated, malformed or re-cased signature,
//! collapses into the same `false`.

use tracing::debug;

use crate::canonical::{
    canonical_record, canonical_record_ordered, canonicalize_json, Canonicalization,
    OrderedPayload, Payload,
};
use crate::hmac_impl::{HmacSha256, MacProvider};
use crate::signer::Signer;
use crate::timing::constant_time_compare;
use crate::{CryptoError, Result};

/// Verify that `signature` was produced with `secret` over `payload` and `timestamp`.
///
/// The payload is canonicalized with sorted keys; a `timestamp` key inside it
/// is overridden by the `timestamp` argument before signing. Returns `true`
/// only for an exact match. A signature of the wrong length is `false`, never
/// a panic.
///
/// ```
/// use hooksig_crypto::{verify, Payload};
///
/// let mut payload = Payload::new();
/// payload.insert("event".into(), "charge.created".into());
/// let sig = "3e0f2fb9a77e5428a02821a7cdbd073da74ce1e43bc304d7907421fc41a81fdd";
///
/// assert!(verify("s3cr3t", &payload, "1700000000", sig));
/// assert!(!verify("s3cr3t", &payload, "1700000001", sig));
/// ```
pub fn verify(secret: &str, payload: &Payload, timestamp: &str, signature: &str) -> bool {
    Verifier::new().verify(secret, payload, timestamp, signature)
}

/// Recomputes and compares signatures with a pluggable MAC.
#[derive(Debug, Clone, Copy, Default)]
pub struct Verifier<M = HmacSha256> {
    signer: Signer<M>,
}

impl Verifier {
    /// Verifier backed by the built-in HMAC-SHA256, sorted-key records.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<M: MacProvider> Verifier<M> {
    /// Verifier using a caller-supplied MAC implementation.
    pub fn with_provider(mac: M) -> Self {
        Self {
            signer: Signer::with_provider(mac),
        }
    }

    /// Set the key order used by [`Verifier::verify_json`].
    pub fn canonicalization(mut self, mode: Canonicalization) -> Self {
        self.signer = self.signer.canonicalization(mode);
        self
    }

    /// Key order used for JSON payloads.
    pub fn mode(&self) -> Canonicalization {
        self.signer.mode()
    }

    /// Verify a sorted-key payload.
    pub fn verify(
        &self,
        secret: impl AsRef<[u8]>,
        payload: &Payload,
        timestamp: &str,
        signature: &str,
    ) -> bool {
        let record = canonical_record(payload, timestamp);
        self.matches(secret, &record, signature, Canonicalization::SortedKeys)
    }

    /// Verify an insertion-order payload.
    pub fn verify_ordered(
        &self,
        secret: impl AsRef<[u8]>,
        payload: &OrderedPayload,
        timestamp: &str,
        signature: &str,
    ) -> bool {
        let record = canonical_record_ordered(payload, timestamp);
        self.matches(secret, &record, signature, Canonicalization::InsertionOrder)
    }

    /// Parse a JSON payload and verify it with the configured key order.
    ///
    /// Errors only when `payload_json` is not a JSON object of strings; a bad
    /// signature is `Ok(false)`.
    pub fn verify_json(
        &self,
        secret: impl AsRef<[u8]>,
        payload_json: &str,
        timestamp: &str,
        signature: &str,
    ) -> Result<bool> {
        let record = canonicalize_json(payload_json, timestamp, self.mode())?;
        Ok(self.matches(secret, &record, signature, self.mode()))
    }

    /// Like [`Verifier::verify`], for callers that propagate with `?`.
    pub fn check(
        &self,
        secret: impl AsRef<[u8]>,
        payload: &Payload,
        timestamp: &str,
        signature: &str,
    ) -> Result<()> {
        if self.verify(secret, payload, timestamp, signature) {
            Ok(())
        } else {
            Err(CryptoError::SignatureMismatch)
        }
    }

    fn matches(
        &self,
        secret: impl AsRef<[u8]>,
        record: &str,
        signature: &str,
        mode: Canonicalization,
    ) -> bool {
        let expected = self.signer.sign(secret, record);
        let accepted = constant_time_compare(expected.as_bytes(), signature.as_bytes());
        debug!(
            mode = %mode,
            record_len = record.len(),
            accepted,
            "Webhook signature checked"
        );
        accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sign;
    use std::sync::Mutex;

    const SECRET: &str = "s3cr3t";
    const TIMESTAMP: &str = "1700000000";
    const SCENARIO_SIG: &str = "3e0f2fb9a77e5428a02821a7cdbd073da74ce1e43bc304d7907421fc41a81fdd";

    fn scenario_payload() -> Payload {
        let mut payload = Payload::new();
        payload.insert("event".into(), "charge.created".into());
        payload
    }

    #[test]
    fn test_scenario_accepts() {
        assert!(verify(SECRET, &scenario_payload(), TIMESTAMP, SCENARIO_SIG));
    }

    #[test]
    fn test_scenario_rejects_other_timestamp() {
        assert!(!verify(SECRET, &scenario_payload(), "1700000001", SCENARIO_SIG));
    }

    #[test]
    fn test_round_trip_through_sign() {
        let mut payload = scenario_payload();
        payload.insert("amount".into(), "100".into());
        let sig = sign(SECRET, &canonical_record(&payload, TIMESTAMP));
        assert!(verify(SECRET, &payload, TIMESTAMP, &sig));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        assert!(!verify("s3cr3t!", &scenario_payload(), TIMESTAMP, SCENARIO_SIG));
    }

    #[test]
    fn test_tampered_value_rejected() {
        let mut payload = scenario_payload();
        payload.insert("event".into(), "charge.refunded".into());
        assert!(!verify(SECRET, &payload, TIMESTAMP, SCENARIO_SIG));
    }

    #[test]
    fn test_added_key_rejected() {
        let mut payload = scenario_payload();
        payload.insert("extra".into(), "".into());
        assert!(!verify(SECRET, &payload, TIMESTAMP, SCENARIO_SIG));
    }

    #[test]
    fn test_every_single_character_flip_rejected() {
        let payload = scenario_payload();
        for i in 0..SCENARIO_SIG.len() {
            let mut bytes = SCENARIO_SIG.as_bytes().to_vec();
            bytes[i] = if bytes[i] == b'0' { b'1' } else { b'0' };
            let tampered = String::from_utf8(bytes).unwrap();
            assert!(!verify(SECRET, &payload, TIMESTAMP, &tampered), "flip at {i}");
        }
    }

    #[test]
    fn test_length_mismatch_is_false() {
        let payload = scenario_payload();
        assert!(!verify(SECRET, &payload, TIMESTAMP, ""));
        assert!(!verify(SECRET, &payload, TIMESTAMP, &SCENARIO_SIG[..63]));
        assert!(!verify(SECRET, &payload, TIMESTAMP, &format!("{SCENARIO_SIG}0")));
    }

    #[test]
    fn test_uppercase_hex_rejected() {
        let upper = SCENARIO_SIG.to_uppercase();
        assert!(!verify(SECRET, &scenario_payload(), TIMESTAMP, &upper));
    }

    #[test]
    fn test_non_ascii_signature_is_false() {
        assert!(!verify(SECRET, &scenario_payload(), TIMESTAMP, "é"));
    }

    #[test]
    fn test_timestamp_argument_wins_over_payload_key() {
        let mut payload = scenario_payload();
        payload.insert("timestamp".into(), "1".into());
        assert!(verify(SECRET, &payload, TIMESTAMP, SCENARIO_SIG));
    }

    #[test]
    fn test_empty_secret_round_trip() {
        let payload = scenario_payload();
        let sig = sign("", &canonical_record(&payload, TIMESTAMP));
        assert!(verify("", &payload, TIMESTAMP, &sig));
        assert!(!verify(SECRET, &payload, TIMESTAMP, &sig));
    }

    #[test]
    fn test_check_maps_to_single_error() {
        let verifier = Verifier::new();
        assert!(verifier
            .check(SECRET, &scenario_payload(), TIMESTAMP, SCENARIO_SIG)
            .is_ok());
        let err = verifier
            .check(SECRET, &scenario_payload(), TIMESTAMP, "nonsense")
            .unwrap_err();
        assert!(matches!(err, CryptoError::SignatureMismatch));
    }

    #[test]
    fn test_verify_ordered() {
        let payload: OrderedPayload = [("timestamp", "0"), ("event", "charge.created")]
            .into_iter()
            .collect();
        let sig = "223a6b944b9296aedc3443a9fc3d884f955f9a759c6ee51fa9338786821e72e3";
        let verifier = Verifier::new();

        assert!(verifier.verify_ordered(SECRET, &payload, TIMESTAMP, sig));
        assert!(!verifier.verify_ordered(SECRET, &payload, TIMESTAMP, SCENARIO_SIG));
    }

    #[test]
    fn test_verify_json() {
        let json = r#"{"event":"charge.created"}"#;
        let verifier = Verifier::new();

        assert!(verifier.verify_json(SECRET, json, TIMESTAMP, SCENARIO_SIG).unwrap());
        assert!(!verifier.verify_json(SECRET, json, TIMESTAMP, "00").unwrap());
        assert!(verifier
            .verify_json(SECRET, "{\"event\":1}", TIMESTAMP, SCENARIO_SIG)
            .is_err());
    }

    #[test]
    fn test_verify_json_insertion_mode() {
        let json = r#"{"timestamp":"0","event":"charge.created"}"#;
        let verifier = Verifier::new().canonicalization(Canonicalization::InsertionOrder);
        let sig = "223a6b944b9296aedc3443a9fc3d884f955f9a759c6ee51fa9338786821e72e3";

        assert_eq!(verifier.mode(), Canonicalization::InsertionOrder);
        assert!(verifier.verify_json(SECRET, json, TIMESTAMP, sig).unwrap());
        assert!(!verifier.verify_json(SECRET, json, TIMESTAMP, SCENARIO_SIG).unwrap());
    }

    #[test]
    fn test_verify_json_insertion_mode_numeric_keys() {
        // Signature over {"2":"z","10":"y","b":"x","timestamp":"9"}, the
        // record an ECMAScript sender produces for this body.
        let sig = "29f7470f12f767487109ecd40939efd076791f1483672c37fe18d32ca083f9f6";
        let json = r#"{"b":"x","10":"y","2":"z"}"#;
        let verifier = Verifier::new().canonicalization(Canonicalization::InsertionOrder);

        assert!(verifier.verify_json(SECRET, json, "9", sig).unwrap());
        assert!(!verifier.verify_json(SECRET, json, "10", sig).unwrap());
    }

    #[test]
    fn test_provider_receives_canonical_record() {
        #[derive(Default)]
        struct Recording {
            calls: Mutex<Vec<(Vec<u8>, Vec<u8>)>>,
        }

        impl MacProvider for Recording {
            fn hmac_sha256_hex(&self, key: &[u8], message: &[u8]) -> String {
                self.calls
                    .lock()
                    .unwrap()
                    .push((key.to_vec(), message.to_vec()));
                "f".repeat(64)
            }
        }

        let mac = Recording::default();
        let verifier = Verifier::with_provider(&mac);
        assert!(verifier.verify(SECRET, &scenario_payload(), TIMESTAMP, &"f".repeat(64)));

        let calls = mac.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, SECRET.as_bytes());
        assert_eq!(
            calls[0].1,
            br#"{"event":"charge.created","timestamp":"1700000000"}"#
        );
    }

    #[test]
    fn test_verifier_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Verifier>();
        assert_send_sync::<Signer>();

        let verifier = Verifier::new();
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    let payload = scenario_payload();
                    assert!(verifier.verify(SECRET, &payload, TIMESTAMP, SCENARIO_SIG));
                });
            }
        });
    }
}
