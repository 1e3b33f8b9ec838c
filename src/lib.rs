//! emby-client
//!
//! Client library for the Emby chat-hosting service: builds signed, shareable
//! chat URLs and performs authenticated API calls.
//!
//! The request-building engine is a pipeline of small pure steps:
//! - [`normalize`]: reshape loose input against a field schema
//! - [`rights`]: encode user permissions against the rights vocabulary
//! - [`signature`]: deterministic MD5 signature over sorted field values
//! - [`params`]: bracket-notation flattening for query strings
//! - [`http`]: single-attempt HTTP transport with response classification
//!
//! [`ChatApi`] composes them into the operations callers need.
#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod normalize;
pub mod params;
pub mod rights;
pub mod signature;
pub mod types;
pub mod url;
pub mod utils;

pub use client::ChatApi;
pub use config::ChatConfig;
pub use error::{ChatError, Result};
pub use http::{HttpVerb, RequestClient, ResponseBody};
pub use params::Paging;
pub use rights::{RightKind, RightsSchema, encode_rights};
pub use url::ChatUrlBuilder;
