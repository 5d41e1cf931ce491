//! Canonical serialization of a payload merged with its timestamp.
//!
//! Signer and verifier must agree byte for byte on what was signed. The
//! record is a compact JSON object: no whitespace, every value a JSON string,
//! strings escaped the way `serde_json` (and ECMAScript `JSON.stringify`)
//! escape them. Two key orders are available:
//!
//! - [`Canonicalization::SortedKeys`]: keys in byte-wise ascending order. This
//!   is the default and the one new integrations should use.
//! - [`Canonicalization::InsertionOrder`]: the key order of an ECMAScript
//!   object literal. Array-index keys (`"0"`, `"2"`, `"10"`) come first in
//!   ascending numeric order, the remaining keys follow in the order the
//!   payload carried them, and `timestamp` is appended last. Matches senders
//!   that run `JSON.stringify` over a spread object literal.
//!
//! In both modes the explicit timestamp argument overrides any `timestamp`
//! key already present in the payload.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::Result;

/// Reserved key the timestamp is stored under in the signed record.
pub const TIMESTAMP_KEY: &str = "timestamp";

/// Application data to authenticate.
///
/// Key order carries no meaning; canonicalization sorts it.
pub type Payload = BTreeMap<String, String>;

/// Key ordering used when serializing the signed record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Canonicalization {
    /// Keys sorted byte-wise.
    #[default]
    #[serde(rename = "sorted")]
    SortedKeys,
    /// Keys in payload order, `timestamp` last unless already present.
    #[serde(rename = "insertion")]
    InsertionOrder,
}

impl Canonicalization {
    /// Short name used in config files and log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            Canonicalization::SortedKeys => "sorted",
            Canonicalization::InsertionOrder => "insertion",
        }
    }
}

impl fmt::Display for Canonicalization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A payload that remembers the order its keys were first seen in.
///
/// Keys are unique. Inserting an existing key replaces its value and keeps
/// its original position, which is also how a repeated key in JSON text is
/// resolved when deserializing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderedPayload {
    entries: Vec<(String, String)>,
}

impl OrderedPayload {
    /// Creates an empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a value, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Looks up a value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copies the entries into a key-sorted [`Payload`].
    pub fn to_sorted(&self) -> Payload {
        self.entries.iter().cloned().collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for OrderedPayload {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut payload = OrderedPayload::new();
        for (k, v) in iter {
            payload.insert(k, v);
        }
        payload
    }
}

struct OrderedPayloadVisitor;

impl<'de> Visitor<'de> for OrderedPayloadVisitor {
    type Value = OrderedPayload;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON object of string values")
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut payload = OrderedPayload::new();
        while let Some((key, value)) = map.next_entry::<String, String>()? {
            payload.insert(key, value);
        }
        Ok(payload)
    }
}

impl<'de> Deserialize<'de> for OrderedPayload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(OrderedPayloadVisitor)
    }
}

/// Build the sorted-key canonical record for `payload` and `timestamp`.
///
/// Accepts any borrowed map (`&BTreeMap`, `&HashMap`, ...);
/// the output does not depend on iteration order. A `timestamp` key in the
/// payload is overwritten by the `timestamp` argument.
///
/// ```
/// use hooksig_crypto::{canonical_record, Payload};
///
/// let mut payload = Payload::new();
/// payload.insert("event".into(), "charge.created".into());
/// assert_eq!(
///     canonical_record(&payload, "1700000000"),
///     r#"{"event":"charge.created","timestamp":"1700000000"}"#
/// );
/// ```
pub fn canonical_record<'a, I, K, V>(payload: I, timestamp: &str) -> String
where
    I: IntoIterator<Item = (&'a K, &'a V)>,
    K: AsRef<str> + ?Sized + 'a,
    V: AsRef<str> + ?Sized + 'a,
{
    let mut merged: BTreeMap<&str, &str> = payload
        .into_iter()
        .map(|(k, v)| (k.as_ref(), v.as_ref()))
        .collect();
    merged.insert(TIMESTAMP_KEY, timestamp);
    write_object(merged)
}

/// Build the insertion-order canonical record.
///
/// Array-index keys are written first, sorted numerically. The other entries
/// keep payload order. The timestamp is appended as the last key, unless the
/// payload already has a `timestamp` key: then that entry keeps its position
/// and takes the `timestamp` argument's value.
pub fn canonical_record_ordered(payload: &OrderedPayload, timestamp: &str) -> String {
    let mut entries: Vec<(&str, &str)> = payload.iter().collect();
    match entries.iter_mut().find(|(k, _)| *k == TIMESTAMP_KEY) {
        Some(entry) => entry.1 = timestamp,
        None => entries.push((TIMESTAMP_KEY, timestamp)),
    }

    let (mut indexed, named): (Vec<_>, Vec<_>) = entries
        .into_iter()
        .partition(|(k, _)| array_index(k).is_some());
    indexed.sort_by_key(|(k, _)| array_index(k));
    write_object(indexed.into_iter().chain(named))
}

/// ECMAScript array index: canonical decimal below `2^32 - 1`.
fn array_index(key: &str) -> Option<u32> {
    let index: u32 = key.parse().ok()?;
    (index != u32::MAX && index.to_string() == key).then_some(index)
}

/// Parse a JSON object of string values into a [`Payload`].
///
/// A repeated key takes its last value.
pub fn parse_payload(json: &str) -> Result<Payload> {
    Ok(serde_json::from_str(json)?)
}

/// Parse a JSON object of string values, keeping key order.
pub fn parse_ordered_payload(json: &str) -> Result<OrderedPayload> {
    Ok(serde_json::from_str(json)?)
}

/// Parse `payload_json` and build its canonical record in the given key order.
pub fn canonicalize_json(
    payload_json: &str,
    timestamp: &str,
    mode: Canonicalization,
) -> Result<String> {
    let record = match mode {
        Canonicalization::SortedKeys => {
            canonical_record(&parse_payload(payload_json)?, timestamp)
        }
        Canonicalization::InsertionOrder => {
            canonical_record_ordered(&parse_ordered_payload(payload_json)?, timestamp)
        }
    };
    Ok(record)
}

fn write_object<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    let mut out = String::from("{");
    for (i, (key, value)) in entries.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        push_json_string(&mut out, key);
        out.push(':');
        push_json_string(&mut out, value);
    }
    out.push('}');
    out
}

fn push_json_string(out: &mut String, s: &str) {
    out.push_str(&serde_json::Value::from(s).to_string());
}
