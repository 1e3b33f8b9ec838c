//! Core error types.

use thiserror::Error;

/// Errors produced while building signed URLs or talking to the chat API.
///
/// Silent drops (unknown rights keys, invalid enum values, empty nested
/// branches) are not represented here; they are logged and skipped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChatError {
    /// Malformed caller data: the call must be fixed, never retried.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Client configuration is unusable (missing secret, bad base URL, ...).
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// The remote service could not be reached or the exchange broke off.
    #[error("Transport error: {0}")]
    TransportError(String),

    /// The remote service answered with a non-success status.
    #[error("API error {status}: {body}")]
    ApiError {
        status: u16,
        /// Raw response body.
        body: String,
        /// Parsed body when the response declared JSON.
        details: Option<serde_json::Value>,
    },

    /// A response declared JSON but its body did not parse.
    #[error("Decode error: {message}")]
    DecodeError { message: String, body: String },
}

impl ChatError {
    /// Create an API error without parsed details.
    pub fn api_error(status: u16, body: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            body: body.into(),
            details: None,
        }
    }

    /// Create an API error carrying a parsed JSON body.
    pub fn api_error_with_details(
        status: u16,
        body: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self::ApiError {
            status,
            body: body.into(),
            details: Some(details),
        }
    }

    /// Create a decode error for a body that failed to parse.
    pub fn decode_error(message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::DecodeError {
            message: message.into(),
            body: body.into(),
        }
    }

    /// HTTP status code, for errors that carry one.
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::ApiError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the server rejected the request with a 4xx status.
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 400 && *status < 500)
    }

    /// True when the server could not be reached at all.
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::TransportError(_))
    }
}

/// Result type used across the crate.
pub type Result<T> = std::result::Result<T, ChatError>;
