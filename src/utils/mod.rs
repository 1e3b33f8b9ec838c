//! Utility modules for emby-client
//!
//! Small helpers shared by the normalizer, the rights encoder and the URL builder.

pub mod random;
pub mod truthy;

pub use random::*;
pub use truthy::*;
