//! Descriptor types
//!
//! Typed forms of the loose inputs accepted by the URL builders and the API
//! actions. Every type serializes to the JSON object shape the normalizer
//! consumes, so plain `serde_json::Value`s work equally well.

pub mod chat;
pub mod message;
pub mod user;

pub use chat::*;
pub use message::*;
pub use user::*;
