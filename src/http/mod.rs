//! HTTP transport
//!
//! Header construction and the single-attempt request client used by the
//! API actions.

pub mod client;
pub mod headers;

pub use client::{HttpVerb, REQUEST_ID_HEADER, RequestClient, ResponseBody};
pub use headers::HttpHeaderBuilder;
