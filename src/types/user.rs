//! User and participant descriptors.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The user opening the chat.
///
/// A user without `id` is a guest and is identified by `session`; one is
/// generated when absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", alias = "avatar")]
    pub picture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Free-form rights, encoded against the rights schema.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rights: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<String>,
}

impl User {
    /// A registered user.
    pub fn with_id<S: Into<String>>(id: S) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    /// A guest user, known only by name.
    pub fn guest<S: Into<String>>(name: S) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn email<S: Into<String>>(mut self, email: S) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn picture<S: Into<String>>(mut self, picture: S) -> Self {
        self.picture = Some(picture.into());
        self
    }

    pub fn link<S: Into<String>>(mut self, link: S) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn rights(mut self, rights: Value) -> Self {
        self.rights = Some(rights);
        self
    }

    pub fn session<S: Into<String>>(mut self, session: S) -> Self {
        self.session = Some(session.into());
        self
    }
}

/// Another member of the chat, shown alongside the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", alias = "avatar")]
    pub picture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default)]
    pub is_bot: bool,
}

impl Participant {
    pub fn new<I: Into<String>, N: Into<String>>(id: I, name: N) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn bot<I: Into<String>, N: Into<String>>(id: I, name: N) -> Self {
        Self {
            is_bot: true,
            ..Self::new(id, name)
        }
    }

    pub fn picture<S: Into<String>>(mut self, picture: S) -> Self {
        self.picture = Some(picture.into());
        self
    }
}
