//! Input normalization.
//!
//! Reshapes loosely-typed caller input (a JSON object) into a clean record,
//! following either a plain list of accepted fields or a table of per-field
//! [`NormalizationRule`]s. Output keys follow schema order, so the same schema
//! always yields the same record layout regardless of the input's key order.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::{ChatError, Result};

/// A normalized record: ordered field name to value.
pub type Record = Map<String, Value>;

/// Per-field transform. Receives the raw value (if present) and returns the
/// value to emit, or `None` to omit the field.
pub type Transform = Arc<dyn Fn(Option<&Value>) -> Option<Value> + Send + Sync>;

/// How a single field is carried from input to record.
#[derive(Clone)]
pub enum NormalizationRule {
    /// Copy the value through (strings trimmed); omit when absent or null.
    CopyVerbatim,
    /// Like `CopyVerbatim`, but use the default when absent or null.
    WithDefault(Value),
    /// Delegate entirely to a transform function.
    CustomTransform(Transform),
}

impl NormalizationRule {
    /// Wrap a closure as a [`NormalizationRule::CustomTransform`].
    pub fn transform<F>(f: F) -> Self
    where
        F: Fn(Option<&Value>) -> Option<Value> + Send + Sync + 'static,
    {
        Self::CustomTransform(Arc::new(f))
    }

    fn apply(&self, raw: Option<&Value>) -> Option<Value> {
        let raw = raw.filter(|v| !v.is_null());
        let value = match self {
            Self::CopyVerbatim => raw.cloned(),
            Self::WithDefault(default) => Some(raw.cloned().unwrap_or_else(|| default.clone())),
            Self::CustomTransform(f) => f(raw),
        };
        value.map(trim_value)
    }
}

impl fmt::Debug for NormalizationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CopyVerbatim => f.write_str("CopyVerbatim"),
            Self::WithDefault(v) => f.debug_tuple("WithDefault").field(v).finish(),
            Self::CustomTransform(_) => f.write_str("CustomTransform(..)"),
        }
    }
}

/// Field schema consulted by [`normalize`].
#[derive(Debug, Clone)]
pub enum Schema {
    /// Accepted field names; present fields are copied verbatim.
    FieldList(Vec<String>),
    /// Ordered field rules.
    FieldRules(Vec<(String, NormalizationRule)>),
}

impl Schema {
    /// Build a [`Schema::FieldList`].
    pub fn field_list<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::FieldList(fields.into_iter().map(Into::into).collect())
    }

    /// Start an empty [`Schema::FieldRules`].
    pub fn rules() -> Self {
        Self::FieldRules(Vec::new())
    }

    /// Append a field rule. Converts a field list into rules if needed.
    pub fn field(self, name: impl Into<String>, rule: NormalizationRule) -> Self {
        let mut rules = match self {
            Self::FieldRules(rules) => rules,
            Self::FieldList(fields) => fields
                .into_iter()
                .map(|f| (f, NormalizationRule::CopyVerbatim))
                .collect(),
        };
        rules.push((name.into(), rule));
        Self::FieldRules(rules)
    }
}

/// Normalize `input` against `schema`.
///
/// Fails with [`ChatError::InvalidInput`] when `input` is not an object.
pub fn normalize(input: &Value, schema: &Schema) -> Result<Record> {
    let object = input.as_object().ok_or_else(|| {
        ChatError::InvalidInput(format!("expected an object, got {}", kind_of(input)))
    })?;

    let mut record = Record::new();
    match schema {
        Schema::FieldList(fields) => {
            for field in fields {
                if let Some(value) = NormalizationRule::CopyVerbatim.apply(object.get(field)) {
                    record.insert(field.clone(), value);
                }
            }
        }
        Schema::FieldRules(rules) => {
            for (field, rule) in rules {
                if let Some(value) = rule.apply(object.get(field)) {
                    record.insert(field.clone(), value);
                }
            }
        }
    }
    Ok(record)
}

/// Short name of a JSON value's type, for error messages.
pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn trim_value(value: Value) -> Value {
    match value {
        Value::String(s) if s.trim().len() != s.len() => Value::String(s.trim().to_string()),
        other => other,
    }
}

/// Transform for identifiers: strings (trimmed, non-empty) and numbers are
/// accepted and emitted as strings, anything else is omitted.
pub fn identifier(raw: Option<&Value>) -> Option<Value> {
    match raw? {
        Value::String(s) if !s.trim().is_empty() => Some(Value::String(s.trim().to_string())),
        Value::Number(n) => Some(Value::String(n.to_string())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn field_list_copies_present_fields_in_schema_order() {
        let input = json!({"name": "  Ann ", "id": "7", "extra": 1});
        let out = normalize(&input, &Schema::field_list(["id", "name", "email"])).unwrap();
        assert_eq!(Value::Object(out.clone()), json!({"id": "7", "name": "Ann"}));
        assert_eq!(out.keys().collect::<Vec<_>>(), ["id", "name"]);
    }

    #[test]
    fn defaults_apply_to_absent_and_null() {
        let schema = Schema::rules()
            .field("is_bot", NormalizationRule::WithDefault(json!(false)))
            .field("name", NormalizationRule::WithDefault(json!("guest")));
        let out = normalize(&json!({"name": null}), &schema).unwrap();
        assert_eq!(Value::Object(out), json!({"is_bot": false, "name": "guest"}));
    }

    #[test]
    fn custom_transform_can_omit_and_output_is_trimmed() {
        let schema = Schema::rules()
            .field(
                "title",
                NormalizationRule::transform(|v| v.map(|v| json!(format!(" {} ", v.as_str().unwrap_or_default())))),
            )
            .field("skip", NormalizationRule::transform(|_| None));
        let out = normalize(&json!({"title": "Room", "skip": "x"}), &schema).unwrap();
        assert_eq!(Value::Object(out), json!({"title": "Room"}));
    }

    #[test]
    fn non_object_input_is_rejected() {
        for input in [json!("room"), json!(1), json!(null), json!([1, 2])] {
            let err = normalize(&input, &Schema::field_list(["id"])).unwrap_err();
            assert!(matches!(err, ChatError::InvalidInput(_)));
        }
    }

    #[test]
    fn identifier_accepts_strings_and_numbers() {
        assert_eq!(identifier(Some(&json!(10000))), Some(json!("10000")));
        assert_eq!(identifier(Some(&json!(" a "))), Some(json!("a")));
        assert_eq!(identifier(Some(&json!(""))), None);
        assert_eq!(identifier(Some(&json!({"id": 1}))), None);
        assert_eq!(identifier(None), None);
    }

    #[test]
    fn field_appends_to_field_list() {
        let schema = Schema::field_list(["id"]).field("flag", NormalizationRule::WithDefault(json!("0")));
        let out = normalize(&json!({"id": "x"}), &schema).unwrap();
        assert_eq!(Value::Object(out), json!({"id": "x", "flag": "0"}));
    }
}
