//! Form encoding for request bodies and query strings
//!
//! The Showdeck API takes `application/x-www-form-urlencoded` requests with
//! bracket notation for nesting: `{a: {b: 1}}` becomes `a[b]=1`, sequences
//! become `a[0]=x&a[1]=y`. Encoding is write-only; responses come back as
//! JSON and are decoded elsewhere.

use std::fmt::Write as _;
use std::sync::OnceLock;

use serde_json::Value;
use url::form_urlencoded::byte_serialize;

use crate::error::{Error, Result};

/// Encode a nested parameter tree into a form-encoded wire string.
///
/// Map keys are emitted in insertion order and sequence order is preserved,
/// so the same tree always encodes to the same string. Keys and values are
/// percent-escaped per the form encoding rules (brackets included).
pub fn encode(params: &Value) -> String {
    let mut pairs: Vec<(String, String)> = Vec::new();
    flatten(None, params, &mut pairs);

    let mut out = String::new();
    for (i, (key, value)) in pairs.iter().enumerate() {
        if i > 0 {
            out.push('&');
        }
        let _ = write!(out, "{}={}", escape(key), escape(value));
    }
    out
}

/// Decoding is intentionally unsupported; this encoder is write-only.
pub fn decode(_encoded: &str) -> Result<Value> {
    Err(Error::Unsupported(
        "form decoding is not implemented".to_string(),
    ))
}

pub(crate) fn escape(s: &str) -> String {
    byte_serialize(s.as_bytes()).collect()
}

fn flatten(prefix: Option<&str>, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let child_key = match prefix {
                    Some(p) => format!("{p}[{key}]"),
                    None => key.clone(),
                };
                flatten(Some(&child_key), child, out);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                let child_key = match prefix {
                    Some(p) => format!("{p}[{index}]"),
                    None => index.to_string(),
                };
                flatten(Some(&child_key), child, out);
            }
        }
        scalar => {
            out.push((prefix.unwrap_or("").to_string(), scalar_to_string(scalar)));
        }
    }
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null => String::new(),
        // Containers are handled by flatten().
        _ => unreachable!("flatten only passes scalars"),
    }
}

/// One logical call's parameter tree plus its memoized wire encoding.
///
/// The wire string is needed twice per request (transport and logging), so
/// it is computed at most once and reused; the payload lives for exactly
/// one logical call and is dropped with it.
#[derive(Debug, Default)]
pub struct FormPayload {
    params: Value,
    wire: OnceLock<String>,
}

impl FormPayload {
    /// Wrap a parameter tree for encoding.
    pub fn new(params: Value) -> Self {
        Self {
            params,
            wire: OnceLock::new(),
        }
    }

    /// The underlying parameter tree.
    pub fn params(&self) -> &Value {
        &self.params
    }

    /// True when there is nothing to encode.
    pub fn is_empty(&self) -> bool {
        match &self.params {
            Value::Null => true,
            Value::Object(map) => map.is_empty(),
            Value::Array(items) => items.is_empty(),
            _ => false,
        }
    }

    /// The form-encoded wire string, computed on first use.
    pub fn wire(&self) -> &str {
        self.wire.get_or_init(|| encode(&self.params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flat_object() {
        let encoded = encode(&json!({"title": "Pilot", "number": 1}));
        assert_eq!(encoded, "title=Pilot&number=1");
    }

    #[test]
    fn test_nested_and_sequence_bracket_notation() {
        let encoded = encode(&json!({"a": [1, 2], "b": {"c": 3}}));
        assert_eq!(encoded, "a%5B0%5D=1&a%5B1%5D=2&b%5Bc%5D=3");
    }

    #[test]
    fn test_deep_nesting() {
        let encoded = encode(&json!({"show": {"owner": {"name": "Robin"}}}));
        assert_eq!(encoded, "show%5Bowner%5D%5Bname%5D=Robin");
    }

    #[test]
    fn test_sequence_of_maps() {
        let encoded = encode(&json!({"tags": [{"name": "tech"}, {"name": "news"}]}));
        assert_eq!(encoded, "tags%5B0%5D%5Bname%5D=tech&tags%5B1%5D%5Bname%5D=news");
    }

    #[test]
    fn test_escaping() {
        let encoded = encode(&json!({"q": "a b&c", "sym": "100%"}));
        assert_eq!(encoded, "q=a+b%26c&sym=100%25");
    }

    #[test]
    fn test_scalar_conversion() {
        let encoded = encode(&json!({"explicit": true, "rating": 4.5, "note": null}));
        assert_eq!(encoded, "explicit=true&rating=4.5&note=");
    }

    #[test]
    fn test_insertion_order_preserved() {
        let encoded = encode(&json!({"z": 1, "a": 2, "m": 3}));
        assert_eq!(encoded, "z=1&a=2&m=3");
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let params = json!({"a": [1, 2], "b": {"c": 3}});
        assert_eq!(encode(&params), encode(&params));
    }

    #[test]
    fn test_payload_caches_encoding() {
        let payload = FormPayload::new(json!({"a": [1, 2], "b": {"c": 3}}));
        let first = payload.wire() as *const str;
        let second = payload.wire() as *const str;
        // Same allocation both times: the encoding ran at most once.
        assert_eq!(first, second);
        assert_eq!(payload.wire(), "a%5B0%5D=1&a%5B1%5D=2&b%5Bc%5D=3");
    }

    #[test]
    fn test_empty_payloads() {
        assert!(FormPayload::new(json!(null)).is_empty());
        assert!(FormPayload::new(json!({})).is_empty());
        assert!(!FormPayload::new(json!({"a": 1})).is_empty());
        assert_eq!(FormPayload::new(json!({})).wire(), "");
    }

    #[test]
    fn test_decode_is_unsupported() {
        let err = decode("a=1").unwrap_err();
        assert!(matches!(err, Error::Unsupported(_)));
        assert!(err.to_string().contains("not implemented"));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: encoding the same tree twice yields byte-identical
            /// output, and every scalar produces exactly one pair.
            #[test]
            fn prop_encode_deterministic_and_complete(
                entries in proptest::collection::vec(("[a-z]{1,8}", "[ -~]{0,16}"), 0..8)
            ) {
                let mut map = serde_json::Map::new();
                for (key, value) in &entries {
                    map.insert(key.clone(), Value::String(value.clone()));
                }
                let params = Value::Object(map.clone());

                let first = encode(&params);
                let second = encode(&params);
                prop_assert_eq!(&first, &second);

                let pairs = if first.is_empty() { 0 } else { first.split('&').count() };
                prop_assert_eq!(pairs, map.len());
            }
        }
    }
}
