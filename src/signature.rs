//! Request signatures.
//!
//! A signature is the hex MD5 digest of a comma-joined list of scalar values:
//! the shared secret and the request nonce first, then the signed fields of
//! each record. Within a record, fields are appended in byte-wise order of
//! their keys, so the caller's key order never affects the digest. The
//! receiving server rebuilds the same list, which makes the join and the
//! allow-lists below part of the wire protocol.

use serde_json::Value;

use crate::normalize::Record;
use crate::params::scalar_to_string;

/// User fields covered by the signature.
pub const USER_SIGNATURE_FIELDS: [&str; 5] = ["id", "name", "email", "link", "picture"];

/// Participant fields covered by the signature.
pub const PARTICIPANT_SIGNATURE_FIELDS: [&str; 2] = ["id", "name"];

/// Chat fields covered by the signature.
pub const CHAT_SIGNATURE_FIELDS: [&str; 4] = ["id", "title", "socket_port", "create"];

/// Separator between signature elements.
pub const SIGNATURE_SEPARATOR: &str = ",";

/// Return `signature` extended with the values of `data`.
///
/// With `allowed`, only keys also present in that list are used; the list's
/// own order is irrelevant. Selected keys are sorted byte-wise and their
/// values appended in that order. Nulls, objects and arrays contribute
/// nothing.
pub fn extend_signature(signature: &[String], data: &Record, allowed: Option<&[&str]>) -> Vec<String> {
    let mut keys: Vec<&String> = data
        .keys()
        .filter(|k| allowed.is_none_or(|allowed| allowed.contains(&k.as_str())))
        .collect();
    keys.sort_unstable_by(|a, b| a.as_bytes().cmp(b.as_bytes()));

    let mut extended = signature.to_vec();
    extended.extend(
        keys.into_iter()
            .filter_map(|k| data.get(k).and_then(scalar_to_string)),
    );
    extended
}

/// Hash a finished element list.
pub fn digest(elements: &[String]) -> String {
    format!("{:x}", md5::compute(elements.join(SIGNATURE_SEPARATOR).as_bytes()))
}

/// Accumulates signature elements in protocol order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureBuilder {
    elements: Vec<String>,
}

impl SignatureBuilder {
    /// Start from the `[secret, nonce]` seed.
    pub fn new(secret: &str, nonce: &str) -> Self {
        Self {
            elements: vec![secret.to_string(), nonce.to_string()],
        }
    }

    /// Start from the `[client_id, secret, nonce]` seed of the older protocol.
    pub fn with_client_id(client_id: &str, secret: &str, nonce: &str) -> Self {
        Self {
            elements: vec![client_id.to_string(), secret.to_string(), nonce.to_string()],
        }
    }

    /// Append the allowed fields of `data`.
    pub fn extend(mut self, data: &Record, allowed: &[&str]) -> Self {
        self.elements = extend_signature(&self.elements, data, Some(allowed));
        self
    }

    /// Append a single raw element.
    pub fn push(mut self, value: &Value) -> Self {
        if let Some(v) = scalar_to_string(value) {
            self.elements.push(v);
        }
        self
    }

    pub fn elements(&self) -> &[String] {
        &self.elements
    }

    /// Hex digest of the accumulated elements.
    pub fn finish(&self) -> String {
        digest(&self.elements)
    }
}
