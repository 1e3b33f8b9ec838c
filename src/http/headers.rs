//! HTTP Headers Utility
//!
//! Builds the header set every API request carries.

use crate::error::ChatError;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};

const APPLICATION_JSON: &str = "application/json";

/// HTTP header builder for API requests
pub struct HttpHeaderBuilder {
    headers: HeaderMap,
}

impl HttpHeaderBuilder {
    /// Create a new header builder
    pub fn new() -> Self {
        Self {
            headers: HeaderMap::new(),
        }
    }

    /// Add Bearer token authorization
    pub fn with_bearer_auth(mut self, token: &str) -> Result<Self, ChatError> {
        let mut auth_value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|e| {
            ChatError::ConfigurationError(format!("Invalid API token format: {e}"))
        })?;
        auth_value.set_sensitive(true);
        self.headers.insert(AUTHORIZATION, auth_value);
        Ok(self)
    }

    /// Add JSON `Accept` and `Content-Type`
    pub fn with_json(mut self) -> Self {
        self.headers
            .insert(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
        self
    }

    /// Add a custom header
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self, ChatError> {
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            ChatError::ConfigurationError(format!("Invalid header name '{name}': {e}"))
        })?;
        self.headers.insert(
            header_name,
            HeaderValue::from_str(value).map_err(|e| {
                ChatError::ConfigurationError(format!("Invalid header value '{value}': {e}"))
            })?,
        );
        Ok(self)
    }

    /// Build the final HeaderMap
    pub fn build(self) -> HeaderMap {
        self.headers
    }
}

impl Default for HttpHeaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// True when a `Content-Type` value declares a JSON body
/// (`application/json`, `application/problem+json; charset=utf-8`, ...).
pub fn is_json_content_type(value: &str) -> bool {
    let mime = value.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
    mime == APPLICATION_JSON || (mime.starts_with("application/") && mime.ends_with("+json"))
}
