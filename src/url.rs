//! Signed chat URLs.
//!
//! Building a URL always runs the same steps, in this order:
//! 1. normalize the chat (object) or take it as a raw id (string);
//! 2. normalize the user, encoding rights and resolving the guest session;
//! 3. draw a 32-character nonce;
//! 4. sign `[secret, nonce]` + user + each participant + chat (or raw chat id);
//! 5. assemble the parameter tree and merge caller extras over it;
//! 6. flatten and append to the base URL.
//!
//! The older `url_by_chat_id` protocol differs only in the seed (client id
//! first) and in the tree keys it emits.

use rand::Rng;
use secrecy::ExposeSecret;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::ChatConfig;
use crate::error::{ChatError, Result};
use crate::normalize::{NormalizationRule, Record, Schema, identifier, kind_of, normalize};
use crate::params::{encode_query, flatten};
use crate::rights::RightsSchema;
use crate::signature::{
    CHAT_SIGNATURE_FIELDS, PARTICIPANT_SIGNATURE_FIELDS, SignatureBuilder, USER_SIGNATURE_FIELDS,
};
use crate::utils::{NONCE_LENGTH, SESSION_LENGTH, random_string};

/// Chat as given by the caller.
enum ChatTarget {
    /// A bare id: signed as the terminal element.
    Id(String),
    /// A normalized chat record: signed with the chat allow-list.
    Record(Record),
}

impl ChatTarget {
    fn id(&self) -> &str {
        match self {
            Self::Id(id) => id,
            Self::Record(record) => record.get("id").and_then(Value::as_str).unwrap_or_default(),
        }
    }
}

/// Which URL protocol to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Protocol {
    Current,
    /// `client_id` seeds the signature and is sent along.
    ClientId,
}

/// Builds signed chat URLs from a configuration.
#[derive(Debug, Clone, Copy)]
pub struct ChatUrlBuilder<'a> {
    config: &'a ChatConfig,
}

impl<'a> ChatUrlBuilder<'a> {
    pub const fn new(config: &'a ChatConfig) -> Self {
        Self { config }
    }

    /// Signed URL for `chat`, opened by `user`, listing `participants`.
    ///
    /// `chat` is either a chat id string or a chat object with a string
    /// `id`. `extra` must serialize to an object (or null); its top-level
    /// keys override computed ones.
    pub fn url<C, U, P, E>(&self, chat: &C, user: &U, participants: &[P], extra: &E) -> Result<String>
    where
        C: Serialize + ?Sized,
        U: Serialize + ?Sized,
        P: Serialize,
        E: Serialize + ?Sized,
    {
        self.url_with_rng(&mut rand::thread_rng(), chat, user, participants, extra)
    }

    /// [`ChatUrlBuilder::url`] with an explicit randomness source.
    pub fn url_with_rng<R, C, U, P, E>(
        &self,
        rng: &mut R,
        chat: &C,
        user: &U,
        participants: &[P],
        extra: &E,
    ) -> Result<String>
    where
        R: Rng,
        C: Serialize + ?Sized,
        U: Serialize + ?Sized,
        P: Serialize,
        E: Serialize + ?Sized,
    {
        let chat = chat_target(&to_input(chat, "chat")?)?;
        let params = self.params(rng, Protocol::Current, chat, user, participants, extra)?;
        Ok(self.finish(&params))
    }

    /// Signed URL in the older client-id protocol.
    ///
    /// Requires a configured `client_id`.
    pub fn url_by_chat_id<U, P, E>(&self, chat_id: &str, user: &U, recipients: &[P], extra: &E) -> Result<String>
    where
        U: Serialize + ?Sized,
        P: Serialize,
        E: Serialize + ?Sized,
    {
        self.url_by_chat_id_with_rng(&mut rand::thread_rng(), chat_id, user, recipients, extra)
    }

    /// [`ChatUrlBuilder::url_by_chat_id`] with an explicit randomness source.
    pub fn url_by_chat_id_with_rng<R, U, P, E>(
        &self,
        rng: &mut R,
        chat_id: &str,
        user: &U,
        recipients: &[P],
        extra: &E,
    ) -> Result<String>
    where
        R: Rng,
        U: Serialize + ?Sized,
        P: Serialize,
        E: Serialize + ?Sized,
    {
        let chat = chat_target(&Value::String(chat_id.to_string()))?;
        let params = self.params(rng, Protocol::ClientId, chat, user, recipients, extra)?;
        Ok(self.finish(&params))
    }

    /// Parameter tree behind [`ChatUrlBuilder::url_with_rng`], before flattening.
    pub fn params_with_rng<R, C, U, P, E>(
        &self,
        rng: &mut R,
        chat: &C,
        user: &U,
        participants: &[P],
        extra: &E,
    ) -> Result<Record>
    where
        R: Rng,
        C: Serialize + ?Sized,
        U: Serialize + ?Sized,
        P: Serialize,
        E: Serialize + ?Sized,
    {
        let chat = chat_target(&to_input(chat, "chat")?)?;
        self.params(rng, Protocol::Current, chat, user, participants, extra)
    }

    fn params<R, U, P, E>(
        &self,
        rng: &mut R,
        protocol: Protocol,
        chat: ChatTarget,
        user: &U,
        participants: &[P],
        extra: &E,
    ) -> Result<Record>
    where
        R: Rng,
        U: Serialize + ?Sized,
        P: Serialize,
        E: Serialize + ?Sized,
    {
        let client_id = match protocol {
            Protocol::Current => None,
            Protocol::ClientId => Some(self.config.client_id.as_deref().ok_or_else(|| {
                ChatError::ConfigurationError("client_id is required for chat id URLs".into())
            })?),
        };

        let user = normalize_user(&to_input(user, "user")?, &self.config.rights_schema, rng)?;
        let participants = participants
            .iter()
            .map(|p| normalize_participant(&to_input(p, "participant")?))
            .collect::<Result<Vec<_>>>()?;
        let extra = to_extra(extra)?;

        let nonce = random_string(NONCE_LENGTH, rng);
        let secret = self.config.client_secret.expose_secret();

        let mut signature = match client_id {
            Some(id) => SignatureBuilder::with_client_id(id, secret, &nonce),
            None => SignatureBuilder::new(secret, &nonce),
        }
        .extend(&user, &USER_SIGNATURE_FIELDS);
        for participant in &participants {
            signature = signature.extend(participant, &PARTICIPANT_SIGNATURE_FIELDS);
        }
        signature = match &chat {
            ChatTarget::Record(record) => signature.extend(record, &CHAT_SIGNATURE_FIELDS),
            ChatTarget::Id(id) => signature.push(&Value::String(id.clone())),
        };
        tracing::debug!(
            chat_id = %chat.id(),
            participants = participants.len(),
            "signed chat url parameters"
        );

        let mut params = Record::new();
        if let Some(id) = client_id {
            params.insert("client_id".into(), Value::String(id.to_string()));
        }
        match (protocol, chat) {
            (Protocol::ClientId, ChatTarget::Id(id)) => {
                params.insert("chat_id".into(), Value::String(id));
                params.insert("rnd".into(), Value::String(nonce));
            }
            (_, ChatTarget::Id(id)) => {
                params.insert("rnd".into(), Value::String(nonce));
                params.insert("chat_id".into(), Value::String(id));
            }
            (_, ChatTarget::Record(record)) => {
                params.insert("rnd".into(), Value::String(nonce));
                params.insert("chat".into(), Value::Object(record));
            }
        }
        params.insert("user".into(), Value::Object(user));
        params.insert(
            "recipients".into(),
            Value::Array(participants.into_iter().map(Value::Object).collect()),
        );
        params.insert("signature".into(), Value::String(signature.finish()));

        for (key, value) in extra {
            params.insert(key, value);
        }
        Ok(params)
    }

    fn finish(&self, params: &Record) -> String {
        let query = encode_query(&flatten(params));
        let base = self.config.base_url();
        if query.is_empty() {
            return base.to_string();
        }
        let separator = if base.contains('?') { '&' } else { '?' };
        format!("{base}{separator}{query}")
    }
}

fn to_input<T: Serialize + ?Sized>(value: &T, what: &str) -> Result<Value> {
    serde_json::to_value(value)
        .map_err(|e| ChatError::InvalidInput(format!("{what} could not be read: {e}")))
}

fn to_extra<E: Serialize + ?Sized>(extra: &E) -> Result<Map<String, Value>> {
    match to_input(extra, "extra")? {
        Value::Null => Ok(Map::new()),
        Value::Object(map) => Ok(map),
        other => Err(ChatError::InvalidInput(format!(
            "extra must be an object, got {}",
            kind_of(&other)
        ))),
    }
}

fn chat_schema() -> Schema {
    Schema::rules()
        .field(
            "id",
            NormalizationRule::transform(|raw| match raw {
                Some(Value::String(s)) if !s.trim().is_empty() => Some(Value::String(s.clone())),
                _ => None,
            }),
        )
        .field("title", NormalizationRule::CopyVerbatim)
        .field("socket_port", NormalizationRule::CopyVerbatim)
        .field("create", NormalizationRule::CopyVerbatim)
}

fn chat_target(chat: &Value) -> Result<ChatTarget> {
    match chat {
        Value::String(id) if !id.trim().is_empty() => Ok(ChatTarget::Id(id.trim().to_string())),
        Value::Object(_) => {
            let record = normalize(chat, &chat_schema())?;
            if !record.contains_key("id") {
                return Err(ChatError::InvalidInput(
                    "chat id is missing or not a string".into(),
                ));
            }
            Ok(ChatTarget::Record(record))
        }
        Value::String(_) => Err(ChatError::InvalidInput("chat id is empty".into())),
        other => Err(ChatError::InvalidInput(format!(
            "chat must be an id or an object, got {}",
            kind_of(other)
        ))),
    }
}

fn participant_schema() -> Schema {
    Schema::rules()
        .field("id", NormalizationRule::transform(identifier))
        .field("name", NormalizationRule::CopyVerbatim)
        .field("email", NormalizationRule::CopyVerbatim)
        .field("picture", NormalizationRule::transform(picture))
        .field("link", NormalizationRule::CopyVerbatim)
        .field("is_bot", NormalizationRule::WithDefault(Value::Bool(false)))
}

fn user_schema(rights: &RightsSchema) -> Schema {
    let rights = rights.clone();
    Schema::rules()
        .field("id", NormalizationRule::transform(identifier))
        .field("name", NormalizationRule::CopyVerbatim)
        .field("email", NormalizationRule::CopyVerbatim)
        .field("picture", NormalizationRule::transform(picture))
        .field("link", NormalizationRule::CopyVerbatim)
        .field(
            "rights",
            NormalizationRule::transform(move |raw| raw.and_then(|r| rights.encode(r)).map(Value::Object)),
        )
        .field("session", NormalizationRule::CopyVerbatim)
}

fn picture(raw: Option<&Value>) -> Option<Value> {
    raw.filter(|v| v.as_str().is_some_and(|s| !s.trim().is_empty())).cloned()
}

/// Normalize the user. Registered users never carry a session; guests keep
/// theirs or get a fresh 40-character token.
fn normalize_user<R: Rng>(user: &Value, rights: &RightsSchema, rng: &mut R) -> Result<Record> {
    let user = match user {
        Value::Null => Value::Object(Map::new()),
        Value::Object(map) => Value::Object(with_avatar_alias(map)),
        other => {
            return Err(ChatError::InvalidInput(format!(
                "user must be an object, got {}",
                kind_of(other)
            )));
        }
    };

    let mut record = normalize(&user, &user_schema(rights))?;
    if record.contains_key("id") {
        record.shift_remove("session");
    } else if !record
        .get("session")
        .and_then(Value::as_str)
        .is_some_and(|s| !s.is_empty())
    {
        record.insert(
            "session".into(),
            Value::String(random_string(SESSION_LENGTH, rng)),
        );
    }
    Ok(record)
}

fn normalize_participant(participant: &Value) -> Result<Record> {
    match participant {
        Value::Object(map) => normalize(&Value::Object(with_avatar_alias(map)), &participant_schema()),
        other => normalize(other, &participant_schema()),
    }
}

/// Older callers send `avatar` instead of `picture`.
fn with_avatar_alias(map: &Map<String, Value>) -> Map<String, Value> {
    let mut map = map.clone();
    if !map.contains_key("picture")
        && let Some(avatar) = map.shift_remove("avatar")
    {
        map.insert("picture".into(), avatar);
    }
    map
}
