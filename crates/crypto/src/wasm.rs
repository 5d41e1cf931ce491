//! WASM bindings for webhook signing and verification.
//!
//! Payloads cross the boundary as JSON text so that browser and Deno callers
//! can pass the request body through untouched.

use wasm_bindgen::prelude::*;

use crate::{Canonicalization, Verifier};

/// Generate the HMAC-SHA256 signature of `data` as a hex string.
#[wasm_bindgen]
pub fn sign(secret: &str, data: &str) -> String {
    crate::sign(secret, data)
}

/// Build the sorted-key canonical record for a JSON payload.
///
/// # Arguments
/// * `payload_json` - JSON object of string values
/// * `timestamp` - Timestamp from the request header
///
/// # Returns
/// The exact string that gets signed
#[wasm_bindgen(js_name = canonicalRecord)]
pub fn canonical_record(payload_json: &str, timestamp: &str) -> Result<String, JsValue> {
    crate::canonicalize_json(payload_json, timestamp, Canonicalization::SortedKeys)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Verify a webhook signature over a JSON payload (sorted keys).
///
/// A payload that does not parse is reported as `false`, same as any other
/// failed verification.
#[wasm_bindgen]
pub fn verify(secret: &str, payload_json: &str, timestamp: &str, signature: &str) -> bool {
    Verifier::new()
        .verify_json(secret, payload_json, timestamp, signature)
        .unwrap_or(false)
}

/// Verify a signature produced by a sender that stringifies an object literal.
#[wasm_bindgen(js_name = verifyInsertionOrder)]
pub fn verify_insertion_order(
    secret: &str,
    payload_json: &str,
    timestamp: &str,
    signature: &str,
) -> bool {
    Verifier::new()
        .canonicalization(Canonicalization::InsertionOrder)
        .verify_json(secret, payload_json, timestamp, signature)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "s3cr3t";
    const SCENARIO_SIG: &str = "3e0f2fb9a77e5428a02821a7cdbd073da74ce1e43bc304d7907421fc41a81fdd";

    #[test]
    fn test_sign_matches_crate() {
        assert_eq!(sign(SECRET, "data"), crate::sign(SECRET, "data"));
    }

    #[test]
    fn test_canonical_record_export() {
        let record = canonical_record(r#"{"event":"charge.created"}"#, "1700000000").unwrap();
        assert_eq!(record, r#"{"event":"charge.created","timestamp":"1700000000"}"#);
    }

    #[test]
    fn test_verify_scenario() {
        let json = r#"{"event":"charge.created"}"#;
        assert!(verify(SECRET, json, "1700000000", SCENARIO_SIG));
        assert!(!verify(SECRET, json, "1700000001", SCENARIO_SIG));
        assert!(!verify("other", json, "1700000000", SCENARIO_SIG));
    }

    #[test]
    fn test_verify_bad_payload_is_false() {
        assert!(!verify(SECRET, r#"["event"]"#, "1700000000", SCENARIO_SIG));
        assert!(!verify(SECRET, r#"{"event":1}"#, "1700000000", SCENARIO_SIG));
        assert!(!verify(SECRET, "not json", "1700000000", SCENARIO_SIG));
    }

    #[test]
    fn test_verify_insertion_order() {
        let sig = "29f7470f12f767487109ecd40939efd076791f1483672c37fe18d32ca083f9f6";
        let json = r#"{"b":"x","10":"y","2":"z"}"#;

        assert!(verify_insertion_order(SECRET, json, "9", sig));
        assert!(!verify(SECRET, json, "9", sig));
        assert!(!verify_insertion_order(SECRET, json, "8", sig));
        assert!(!verify_insertion_order(SECRET, r#"{"b":null}"#, "9", sig));
    }
}
