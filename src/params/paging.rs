//! Paging parameters for list endpoints.

use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::normalize::{NormalizationRule, Record, Schema, normalize};

/// Upper bound the service accepts for `limit`.
pub const MAX_PAGE_LIMIT: u64 = 1000;

/// `limit` used when the caller gives none.
pub const DEFAULT_PAGE_LIMIT: u64 = 100;

/// Paging request for list endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Paging {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl Paging {
    pub const fn new(page: u64, limit: u64) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }

    /// Normalized `{limit, page}` record for this request.
    pub fn to_params(&self) -> Result<Record> {
        paging_params(&serde_json::to_value(self)?)
    }
}

fn paging_schema() -> Schema {
    Schema::rules()
        .field(
            "limit",
            NormalizationRule::transform(|raw| {
                let limit = raw.and_then(as_count).unwrap_or(DEFAULT_PAGE_LIMIT);
                Some(Value::from(limit.clamp(1, MAX_PAGE_LIMIT)))
            }),
        )
        .field(
            "page",
            NormalizationRule::transform(|raw| {
                Some(Value::from(raw.and_then(as_count).unwrap_or(1).max(1)))
            }),
        )
}

/// Normalize loose paging input: `limit` is clamped to `1..=1000`
/// (default 100) and `page` is at least 1.
pub fn paging_params(input: &Value) -> Result<Record> {
    normalize(input, &paging_schema())
}

fn as_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_i64().map(|i| i.max(0) as u64))
            .or_else(|| n.as_f64().map(|f| f.max(0.0) as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
