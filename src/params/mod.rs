//! Parameter Encoding Module
//!
//! Turns assembled parameter trees into wire form:
//! - `flatten`: bracket-notation flattening of nested objects and arrays
//! - `paging`: normalized `limit`/`page` parameters for list endpoints

pub mod flatten;
pub mod paging;

pub use flatten::*;
pub use paging::*;
