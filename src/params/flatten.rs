//! Bracket-notation flattening.
//!
//! `{"user": {"rights": {"kick_users": "1"}}}` becomes
//! `user[rights][kick_users]=1`; arrays use their indexes as keys
//! (`recipients[0][id]=...`). Output order follows the tree's insertion
//! order, which `serde_json`'s `preserve_order` keeps for objects.

use serde_json::{Map, Value};

/// A flattened `(key, value)` pair, ready for query or form encoding.
pub type Pair = (String, String);

/// Render a scalar leaf the way the chat service expects it.
///
/// Strings are verbatim, numbers use their decimal form and booleans become
/// `"1"`/`"0"`. Nulls and containers are not scalars.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Flatten `tree` into bracket-notation pairs.
pub fn flatten(tree: &Map<String, Value>) -> Vec<Pair> {
    flatten_with(tree, "", "")
}

/// Flatten `tree`, wrapping every top-level key as `{prefix}{key}{suffix}`.
///
/// Nested containers recurse with `{name}[` / `]`. Empty containers and
/// null leaves produce no pairs.
pub fn flatten_with(tree: &Map<String, Value>, prefix: &str, suffix: &str) -> Vec<Pair> {
    let mut pairs = Vec::new();
    for (key, value) in tree {
        flatten_value(&format!("{prefix}{key}{suffix}"), value, &mut pairs);
    }
    pairs
}

fn flatten_value(name: &str, value: &Value, out: &mut Vec<Pair>) {
    match value {
        Value::Object(map) if map.is_empty() => {
            tracing::debug!(key = %name, "dropping empty object");
        }
        Value::Array(items) if items.is_empty() => {
            tracing::debug!(key = %name, "dropping empty array");
        }
        Value::Object(map) => {
            for (key, child) in map {
                flatten_value(&format!("{name}[{key}]"), child, out);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                flatten_value(&format!("{name}[{index}]"), child, out);
            }
        }
        leaf => {
            if let Some(v) = scalar_to_string(leaf) {
                out.push((name.to_string(), v));
            }
        }
    }
}

/// Percent-encode flattened pairs as `key=value&...`.
///
/// Brackets in keys stay literal so the structure remains readable.
pub fn encode_query(pairs: &[Pair]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", encode_key(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

fn encode_key(key: &str) -> String {
    urlencoding::encode(key)
        .replace("%5B", "[")
        .replace("%5D", "]")
}
