//! Explicit truthy-token parsing.

use serde_json::Value;

/// Tokens (compared case-insensitively) that read as `true`.
pub const TRUTHY_TOKENS: [&str; 4] = ["1", "on", "true", "yes"];

/// Interpret a loose value as a boolean flag.
///
/// `true`, the number one (`1` or `1.0`), or a string in [`TRUTHY_TOKENS`] is
/// truthy.
/// Everything else (including `null`, objects and arrays) is falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => is_truthy_token(s),
        Value::Number(n) => n.as_f64() == Some(1.0),
        _ => false,
    }
}

/// Token form of [`is_truthy`].
pub fn is_truthy_token(token: &str) -> bool {
    TRUTHY_TOKENS
        .iter()
        .any(|candidate| candidate.eq_ignore_ascii_case(token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn recognises_tokens() {
        for v in [json!("1"), json!("on"), json!("TRUE"), json!("Yes"), json!(true), json!(1), json!(1.0)] {
            assert!(is_truthy(&v), "{v} should be truthy");
        }
    }

    #[test]
    fn everything_else_is_falsy() {
        for v in [
            json!("0"),
            json!("off"),
            json!("enabled"),
            json!(false),
            json!(2),
            json!(1.5),
            json!(-1),
            json!(null),
            json!({}),
            json!([]),
        ] {
            assert!(!is_truthy(&v), "{v} should be falsy");
        }
    }
}
