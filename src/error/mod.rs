//! Error Handling Module
//!
//! This module provides the error type shared by every operation of the library:
//! - Core error type (`ChatError`) and its classification helpers
//! - Type conversions from common error types
//!
//! # Example
//!
//! ```rust,ignore
//! use emby_client::error::ChatError;
//!
//! let error = ChatError::api_error(404, "Not found");
//! assert_eq!(error.status_code(), Some(404));
//! assert!(error.is_client_error());
//! ```

mod conversions;
pub mod types;

pub use types::*;
