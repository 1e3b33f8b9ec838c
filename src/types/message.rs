//! Message payloads for the API actions.

use serde::{Deserialize, Serialize};

use super::User;

/// A message posted on behalf of a user.
///
/// Only the user's profile fields are sent; rights and session stay behind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewMessage {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

impl NewMessage {
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            user: None,
        }
    }

    pub fn from_user(mut self, user: User) -> Self {
        self.user = Some(user);
        self
    }
}

/// Changes to an existing message.
///
/// Deleting wins: when `is_deleted` is set, `text` is not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default)]
    pub is_deleted: bool,
}

impl MessageUpdate {
    pub fn text<S: Into<String>>(text: S) -> Self {
        Self {
            text: Some(text.into()),
            is_deleted: false,
        }
    }

    pub fn deleted() -> Self {
        Self {
            text: None,
            is_deleted: true,
        }
    }
}
