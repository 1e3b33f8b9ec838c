//! User rights encoding.
//!
//! Maps a free-form permission object onto the fixed capability vocabulary
//! published by the chat service. Unknown keys and invalid enum values are
//! dropped; the encoder never fails.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{ChatError, Result};
use crate::utils::is_truthy;

const DEFAULT_SCHEMA: &str = include_str!("rights.scheme.json");

/// Shape of a single right.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RightKind {
    /// Encoded as `"1"` or `"0"`.
    Boolean,
    /// Must be one of `values`.
    Enum { values: Vec<String> },
}

/// Rights vocabulary: right name to its kind.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct RightsSchema {
    rights: HashMap<String, RightKind>,
}

impl RightsSchema {
    /// Parse a schema from its JSON form:
    /// `{"kick_users": {"type": "boolean"}, "delete_messages": {"type": "enum", "values": [...]}}`.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| ChatError::ConfigurationError(format!("Invalid rights schema: {e}")))
    }

    /// Build a schema from explicit entries.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, RightKind)>,
        S: Into<String>,
    {
        Self {
            rights: entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Look up a right by name.
    pub fn get(&self, name: &str) -> Option<&RightKind> {
        self.rights.get(name)
    }

    pub fn len(&self) -> usize {
        self.rights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rights.is_empty()
    }

    /// Encode `rights` against this schema.
    ///
    /// Returns `None` when the input is not an object, has no keys, or
    /// nothing survived encoding. Output keys keep input order.
    pub fn encode(&self, rights: &Value) -> Option<Map<String, Value>> {
        let input = rights.as_object().filter(|m| !m.is_empty())?;

        let mut encoded = Map::new();
        for (key, raw) in input {
            let Some(kind) = self.get(key) else {
                tracing::debug!(right = %key, "dropping unknown right");
                continue;
            };
            let value = effective_value(raw);
            match kind {
                RightKind::Boolean => {
                    let flag = if is_truthy(&value) { "1" } else { "0" };
                    encoded.insert(key.clone(), Value::String(flag.to_string()));
                }
                RightKind::Enum { values } => match value.as_str() {
                    Some(v) if values.iter().any(|allowed| allowed == v) => {
                        encoded.insert(key.clone(), value.clone());
                    }
                    _ => {
                        tracing::debug!(right = %key, value = %value, "dropping invalid enum value");
                    }
                },
            }
        }

        (!encoded.is_empty()).then_some(encoded)
    }
}

static BUNDLED_SCHEMA: LazyLock<RightsSchema> = LazyLock::new(|| {
    RightsSchema::from_json_str(DEFAULT_SCHEMA).unwrap_or_else(|e| {
        tracing::warn!("bundled rights schema failed to load: {e}");
        RightsSchema {
            rights: HashMap::new(),
        }
    })
});

impl Default for RightsSchema {
    /// The vocabulary bundled with this crate.
    fn default() -> Self {
        BUNDLED_SCHEMA.clone()
    }
}

/// Encode `rights` against the bundled vocabulary.
pub fn encode_rights(rights: &Value) -> Option<Map<String, Value>> {
    BUNDLED_SCHEMA.encode(rights)
}

/// Older clients sent `value:extra:...`; only the first segment counts.
fn effective_value(raw: &Value) -> Value {
    match raw {
        Value::String(s) => match s.split_once(':') {
            Some((head, _)) => Value::String(head.to_string()),
            None => raw.clone(),
        },
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> RightsSchema {
        RightsSchema::from_entries([
            ("send_messages", RightKind::Boolean),
            ("kick_users", RightKind::Boolean),
            (
                "delete_messages",
                RightKind::Enum {
                    values: vec!["any".into(), "my".into(), "none".into()],
                },
            ),
        ])
    }

    #[test]
    fn bundled_schema_parses() {
        let schema = RightsSchema::from_json_str(DEFAULT_SCHEMA).unwrap();
        assert_eq!(schema.get("kick_users"), Some(&RightKind::Boolean));
        assert!(matches!(schema.get("delete_messages"), Some(RightKind::Enum { .. })));
        assert_eq!(schema.len(), RightsSchema::default().len());
    }

    #[test]
    fn unknown_keys_are_dropped() {
        let out = schema().encode(&json!({"send_messages": "on", "bogus": true})).unwrap();
        assert_eq!(Value::Object(out), json!({"send_messages": "1"}));
    }

    #[test]
    fn booleans_are_coerced() {
        let out = schema()
            .encode(&json!({"send_messages": true, "kick_users": "off"}))
            .unwrap();
        assert_eq!(Value::Object(out), json!({"send_messages": "1", "kick_users": "0"}));
    }

    #[test]
    fn enum_requires_exact_match() {
        assert_eq!(schema().encode(&json!({"delete_messages": "ANY"})), None);
        let out = schema().encode(&json!({"delete_messages": "my"})).unwrap();
        assert_eq!(Value::Object(out), json!({"delete_messages": "my"}));
    }

    #[test]
    fn legacy_colon_list_uses_first_segment() {
        let out = schema()
            .encode(&json!({"delete_messages": "any:12:34", "kick_users": "yes:ignored"}))
            .unwrap();
        assert_eq!(Value::Object(out), json!({"delete_messages": "any", "kick_users": "1"}));
    }

    #[test]
    fn empty_or_non_object_yields_none() {
        assert_eq!(schema().encode(&json!({})), None);
        assert_eq!(schema().encode(&json!("kick_users")), None);
        assert_eq!(schema().encode(&json!({"bogus": 1})), None);
    }

    #[tracing_test::traced_test]
    #[test]
    fn dropped_keys_are_logged() {
        assert_eq!(schema().encode(&json!({"bogus": true, "delete_messages": "all"})), None);
        assert!(logs_contain("dropping unknown right"));
        assert!(logs_contain("dropping invalid enum value"));
    }

    #[test]
    fn schema_parse_error_is_configuration_error() {
        let err = RightsSchema::from_json_str(r#"{"x": {"type": "color"}}"#).unwrap_err();
        assert!(matches!(err, ChatError::ConfigurationError(_)));
    }
}
