//! Shared helpers for integration tests.
#![allow(dead_code)]

use emby_client::{ChatApi, ChatConfig};
use serde_json::{Map, Value};

pub const SECRET: &str = "test-secret";
pub const API_TOKEN: &str = "test-api-token";

/// Client whose API host is the mock server.
pub fn api_for(server_uri: &str) -> ChatApi {
    let config = ChatConfig::new(SECRET, API_TOKEN, "https://chat.example.com")
        .with_client_id("client-1")
        .with_api_url(server_uri);
    ChatApi::new(config).expect("valid config")
}

/// Rebuild a tree from bracket-notation pairs. Every container comes back as
/// an object, so arrays reappear keyed by index.
pub fn unflatten(pairs: &[(String, String)]) -> Map<String, Value> {
    let mut root = Map::new();
    for (key, value) in pairs {
        let mut segments = Vec::new();
        let (head, rest) = key.split_once('[').map_or((key.as_str(), ""), |(h, r)| (h, r));
        segments.push(head.to_string());
        for part in rest.split('[') {
            let part = part.trim_end_matches(']');
            if !part.is_empty() {
                segments.push(part.to_string());
            }
        }

        let mut node = &mut root;
        let last = segments.len() - 1;
        for (i, segment) in segments.into_iter().enumerate() {
            if i == last {
                node.insert(segment, Value::String(value.clone()));
                break;
            }
            node = node
                .entry(segment)
                .or_insert_with(|| Value::Object(Map::new()))
                .as_object_mut()
                .expect("container segment");
        }
    }
    root
}

/// Shape a tree the way `unflatten` returns it: arrays become index-keyed
/// objects, scalars become their wire strings, empty branches and nulls vanish.
pub fn wire_shape(value: &Value) -> Option<Value> {
    match value {
        Value::Object(map) => {
            let out: Map<String, Value> = map
                .iter()
                .filter_map(|(k, v)| wire_shape(v).map(|v| (k.clone(), v)))
                .collect();
            (!out.is_empty()).then_some(Value::Object(out))
        }
        Value::Array(items) => {
            let out: Map<String, Value> = items
                .iter()
                .enumerate()
                .filter_map(|(i, v)| wire_shape(v).map(|v| (i.to_string(), v)))
                .collect();
            (!out.is_empty()).then_some(Value::Object(out))
        }
        other => emby_client::params::scalar_to_string(other).map(Value::String),
    }
}
