//! Chat descriptor.

use serde::{Deserialize, Serialize};

/// A chat room, identified by `id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub socket_port: Option<u16>,
    /// Ask the service to create the room on first open.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create: Option<bool>,
}

impl Chat {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_title<S: Into<String>>(mut self, title: S) -> Self {
        self.title = Some(title.into());
        self
    }

    pub const fn with_socket_port(mut self, port: u16) -> Self {
        self.socket_port = Some(port);
        self
    }

    pub const fn with_create(mut self, create: bool) -> Self {
        self.create = Some(create);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_only_present_fields() {
        let chat = Chat::new("room1").with_title("Lobby");
        assert_eq!(
            serde_json::to_value(&chat).unwrap(),
            json!({"id": "room1", "title": "Lobby"})
        );
    }
}
