//! Emby chat client
//!
//! [`ChatApi`] is the public entry point: it hands out signed chat URLs and
//! performs API actions against the configured service.
//!
//! # Example
//! ```rust,no_run
//! use emby_client::{ChatApi, ChatConfig, Paging};
//! use emby_client::types::{MessageUpdate, User};
//!
//! # async fn example() -> Result<(), emby_client::ChatError> {
//! let api = ChatApi::new(ChatConfig::from_env()?)?;
//!
//! let link = api.url("room1", &User::guest("Ann"), &[] as &[User], &())?;
//! let history = api.messages("room1", Paging::new(1, 50)).await?;
//! api.update_message("room1", "m-1", &MessageUpdate::deleted()).await?;
//! # Ok(())
//! # }
//! ```

use serde::Serialize;
use serde_json::Value;

use crate::config::ChatConfig;
use crate::error::{ChatError, Result};
use crate::http::{HttpVerb, RequestClient, ResponseBody};
use crate::normalize::{NormalizationRule, Record, Schema, identifier, normalize};
use crate::params::Paging;
use crate::types::{Chat, MessageUpdate, NewMessage};
use crate::url::ChatUrlBuilder;

/// Client for one configured chat service.
#[derive(Debug, Clone)]
pub struct ChatApi {
    config: ChatConfig,
    http: RequestClient,
}

impl ChatApi {
    /// Validate `config` and create a client.
    pub fn new(config: ChatConfig) -> Result<Self> {
        Self::with_http_client(config, reqwest::Client::new())
    }

    /// Create a client reusing an existing `reqwest::Client`.
    pub fn with_http_client(config: ChatConfig, http_client: reqwest::Client) -> Result<Self> {
        config.validate()?;
        let http = RequestClient::with_http_client(&config, http_client);
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// URL builder bound to this client's configuration.
    pub fn url_builder(&self) -> ChatUrlBuilder<'_> {
        ChatUrlBuilder::new(&self.config)
    }

    /// Signed, shareable URL. See [`ChatUrlBuilder::url`].
    pub fn url<C, U, P, E>(&self, chat: &C, user: &U, participants: &[P], extra: &E) -> Result<String>
    where
        C: Serialize + ?Sized,
        U: Serialize + ?Sized,
        P: Serialize,
        E: Serialize + ?Sized,
    {
        self.url_builder().url(chat, user, participants, extra)
    }

    /// Signed URL in the client-id protocol. See [`ChatUrlBuilder::url_by_chat_id`].
    pub fn url_by_chat_id<U, P, E>(&self, chat_id: &str, user: &U, recipients: &[P], extra: &E) -> Result<String>
    where
        U: Serialize + ?Sized,
        P: Serialize,
        E: Serialize + ?Sized,
    {
        self.url_builder().url_by_chat_id(chat_id, user, recipients, extra)
    }

    /// Raw API call against `api/{version}/{method}` with the configured version.
    pub async fn call(&self, method: &str, params: &Record, verb: HttpVerb) -> Result<ResponseBody> {
        self.http
            .call(method, params, verb, &self.config.api_version)
            .await
    }

    // ========================================================================
    // Chats
    // ========================================================================

    /// List chats.
    pub async fn chats(&self, paging: Paging) -> Result<ResponseBody> {
        self.call("chats", &paging.to_params()?, HttpVerb::Get).await
    }

    /// Fetch one chat.
    pub async fn chat(&self, chat_id: &str) -> Result<ResponseBody> {
        self.call(&chat_path(chat_id)?, &Record::new(), HttpVerb::Get)
            .await
    }

    /// Create a chat.
    pub async fn create_chat(&self, chat: &Chat) -> Result<ResponseBody> {
        let record = chat_record(chat)?;
        self.call("chats", &wrap("chat", record), HttpVerb::Post)
            .await
    }

    /// Update a chat's title, port or creation flag.
    pub async fn update_chat(&self, chat: &Chat) -> Result<ResponseBody> {
        let path = chat_path(&chat.id)?;
        let record = chat_record(chat)?;
        self.call(&path, &wrap("chat", record), HttpVerb::Put).await
    }

    /// Delete a chat.
    pub async fn delete_chat(&self, chat_id: &str) -> Result<ResponseBody> {
        self.call(&chat_path(chat_id)?, &Record::new(), HttpVerb::Delete)
            .await
    }

    /// List the users of a chat.
    pub async fn chat_users(&self, chat_id: &str, paging: Paging) -> Result<ResponseBody> {
        let path = format!("{}/users", chat_path(chat_id)?);
        self.call(&path, &paging.to_params()?, HttpVerb::Get).await
    }

    // ========================================================================
    // Messages
    // ========================================================================

    /// List the messages of a chat.
    pub async fn messages(&self, chat_id: &str, paging: Paging) -> Result<ResponseBody> {
        let path = format!("{}/messages", chat_path(chat_id)?);
        self.call(&path, &paging.to_params()?, HttpVerb::Get).await
    }

    /// Post a message.
    pub async fn send_message(&self, chat_id: &str, message: &NewMessage) -> Result<ResponseBody> {
        let path = format!("{}/messages", chat_path(chat_id)?);
        let record = message_record(message)?;
        self.call(&path, &wrap("message", record), HttpVerb::Post)
            .await
    }

    /// Edit or delete a message.
    ///
    /// Deletion sends only `is_deleted = "1"`, never the text.
    pub async fn update_message(
        &self,
        chat_id: &str,
        message_id: &str,
        update: &MessageUpdate,
    ) -> Result<ResponseBody> {
        let path = message_path(chat_id, message_id)?;
        let mut record = Record::new();
        if update.is_deleted {
            record.insert("is_deleted".into(), Value::String("1".into()));
        } else {
            match update.text.as_deref().map(str::trim) {
                Some(text) if !text.is_empty() => {
                    record.insert("text".into(), Value::String(text.to_string()));
                }
                _ => {
                    return Err(ChatError::InvalidInput(
                        "message update needs text or is_deleted".into(),
                    ));
                }
            }
        }
        self.call(&path, &wrap("message", record), HttpVerb::Put)
            .await
    }

    /// Delete a message.
    pub async fn delete_message(&self, chat_id: &str, message_id: &str) -> Result<ResponseBody> {
        self.call(
            &message_path(chat_id, message_id)?,
            &Record::new(),
            HttpVerb::Delete,
        )
        .await
    }
}

fn wrap(key: &str, record: Record) -> Record {
    let mut params = Record::new();
    params.insert(key.to_string(), Value::Object(record));
    params
}

fn chat_record(chat: &Chat) -> Result<Record> {
    let schema = Schema::field_list(["id", "title", "socket_port", "create"]);
    let record = normalize(&serde_json::to_value(chat)?, &schema)?;
    if record.get("id").and_then(Value::as_str).is_none_or(str::is_empty) {
        return Err(ChatError::InvalidInput("chat id is empty".into()));
    }
    Ok(record)
}

/// `{text, user}` for a new message; the author is cut down to profile fields.
fn message_record(message: &NewMessage) -> Result<Record> {
    let schema = Schema::rules()
        .field("text", NormalizationRule::CopyVerbatim)
        .field(
            "user",
            NormalizationRule::transform(|raw| {
                let author = normalize(raw?, &author_schema()).ok()?;
                (!author.is_empty()).then_some(Value::Object(author))
            }),
        );
    let record = normalize(&serde_json::to_value(message)?, &schema)?;
    if record.get("text").and_then(Value::as_str).is_none_or(str::is_empty) {
        return Err(ChatError::InvalidInput("message text is empty".into()));
    }
    Ok(record)
}

fn author_schema() -> Schema {
    Schema::rules()
        .field("id", NormalizationRule::transform(identifier))
        .field("name", NormalizationRule::CopyVerbatim)
        .field("email", NormalizationRule::CopyVerbatim)
        .field("picture", NormalizationRule::CopyVerbatim)
        .field("link", NormalizationRule::CopyVerbatim)
}

fn path_segment<'a>(value: &'a str, what: &str) -> Result<std::borrow::Cow<'a, str>> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ChatError::InvalidInput(format!("{what} is empty")));
    }
    Ok(urlencoding::encode(value))
}

fn chat_path(chat_id: &str) -> Result<String> {
    Ok(format!("chats/{}", path_segment(chat_id, "chat id")?))
}

fn message_path(chat_id: &str, message_id: &str) -> Result<String> {
    Ok(format!(
        "{}/messages/{}",
        chat_path(chat_id)?,
        path_segment(message_id, "message id")?
    ))
}
