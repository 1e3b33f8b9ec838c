//! Type Conversions for ChatError
//!
//! From implementations for the library errors we bubble up with `?`.

use super::types::ChatError;

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        Self::TransportError(err.to_string())
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        Self::decode_error(err.to_string(), String::new())
    }
}
