//! Request client.
//!
//! One call, one attempt: no retries, timeouts or queuing happen here. Callers
//! that need resilience wrap [`RequestClient::call`].

use std::fmt;

use reqwest::header::CONTENT_TYPE;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::Instrument;

use super::headers::{HttpHeaderBuilder, is_json_content_type};
use crate::config::ChatConfig;
use crate::error::{ChatError, Result};
use crate::normalize::Record;
use crate::params::{encode_query, flatten};

/// Header carrying the per-request id that also tags the tracing span.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// HTTP verbs the chat API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpVerb {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpVerb {
    /// Whether parameters travel in the query string rather than a JSON body.
    pub const fn uses_query(self) -> bool {
        matches!(self, Self::Get | Self::Delete)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    fn to_method(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of a successful response.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// The response declared a JSON content type.
    Json(Value),
    /// Anything else, passed through untouched.
    Text(String),
}

impl ResponseBody {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(v) => Some(v),
            Self::Text(_) => None,
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            Self::Json(v) => Some(v),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(t) => Some(t),
            Self::Json(_) => None,
        }
    }
}

/// Sends authenticated requests to `{api_url}/api/{version}/{method}`.
#[derive(Debug, Clone)]
pub struct RequestClient {
    http_client: reqwest::Client,
    api_url: String,
    api_token: SecretString,
}

impl RequestClient {
    /// Create a client for the API host and token in `config`.
    pub fn new(config: &ChatConfig) -> Self {
        Self::with_http_client(config, reqwest::Client::new())
    }

    /// Create a client reusing an existing `reqwest::Client`.
    pub fn with_http_client(config: &ChatConfig, http_client: reqwest::Client) -> Self {
        Self {
            http_client,
            api_url: config.api_url().to_string(),
            api_token: config.api_token.clone(),
        }
    }

    /// Full URL for `method`, without query string.
    pub fn endpoint(&self, method: &str, api_version: &str) -> String {
        format!(
            "{}/api/{}/{}",
            self.api_url,
            api_version,
            method.trim_start_matches('/')
        )
    }

    /// Perform one API call.
    ///
    /// GET and DELETE send the flattened `params` as a query string; POST and
    /// PUT send them as a JSON body. Statuses in `200..400` succeed; anything
    /// else becomes [`ChatError::ApiError`].
    pub async fn call(
        &self,
        method: &str,
        params: &Record,
        verb: HttpVerb,
        api_version: &str,
    ) -> Result<ResponseBody> {
        let mut url = self.endpoint(method, api_version);
        let request_id = uuid::Uuid::new_v4().to_string();
        let headers = HttpHeaderBuilder::new()
            .with_bearer_auth(self.api_token.expose_secret())?
            .with_json()
            .with_header(REQUEST_ID_HEADER, &request_id)?
            .build();

        let request = if verb.uses_query() {
            let pairs = flatten(params);
            if !pairs.is_empty() {
                url.push('?');
                url.push_str(&encode_query(&pairs));
            }
            self.http_client.request(verb.to_method(), &url)
        } else {
            self.http_client
                .request(verb.to_method(), &url)
                .body(serde_json::to_vec(params)?)
        }
        .headers(headers);

        let span = tracing::debug_span!(
            "emby_api_call",
            request_id = %request_id,
            verb = %verb,
            method = %method,
        );
        async move {
            tracing::debug!(url = %url, "sending request");
            let response = request.send().await?;
            classify_response(response).await
        }
        .instrument(span)
        .await
    }
}

async fn classify_response(response: reqwest::Response) -> Result<ResponseBody> {
    let status = response.status().as_u16();
    let declares_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(is_json_content_type);
    let text = response.text().await?;

    if (200..400).contains(&status) {
        tracing::debug!(status, "request succeeded");
        if declares_json {
            return serde_json::from_str(&text)
                .map(ResponseBody::Json)
                .map_err(|e| ChatError::decode_error(e.to_string(), text));
        }
        return Ok(ResponseBody::Text(text));
    }

    tracing::warn!(status, "request rejected by server");
    match declares_json
        .then(|| serde_json::from_str::<Value>(&text).ok())
        .flatten()
    {
        Some(details) => Err(ChatError::api_error_with_details(status, text, details)),
        None => Err(ChatError::api_error(status, text)),
    }
}
