//! Client Configuration
//!
//! Credentials and endpoints shared by the URL builders and the API client.

use secrecy::{ExposeSecret, SecretString};

use crate::error::{ChatError, Result};
use crate::rights::RightsSchema;

/// API version used when none is configured.
pub const DEFAULT_API_VERSION: &str = "v1";

/// Emby client configuration.
///
/// # Example
/// ```rust,ignore
/// use emby_client::ChatConfig;
///
/// let config = ChatConfig::new("client-secret", "api-token", "https://chat.example.com/")
///     .with_client_id("client-42");
/// assert_eq!(config.base_url(), "https://chat.example.com");
/// ```
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Public client id, only used by the older URL protocol.
    pub client_id: Option<String>,
    /// Shared secret that seeds every signature.
    pub client_secret: SecretString,
    /// Bearer token for API calls.
    pub api_token: SecretString,
    base_url: String,
    api_url: Option<String>,
    /// Version segment of API paths (`/api/{version}/...`).
    pub api_version: String,
    /// Vocabulary used to encode user rights.
    pub rights_schema: RightsSchema,
}

impl ChatConfig {
    /// Create a configuration. Trailing slashes of `base_url` are dropped.
    pub fn new<S, T, U>(client_secret: S, api_token: T, base_url: U) -> Self
    where
        S: Into<String>,
        T: Into<String>,
        U: Into<String>,
    {
        Self {
            client_id: None,
            client_secret: SecretString::from(client_secret.into()),
            api_token: SecretString::from(api_token.into()),
            base_url: strip_trailing_slashes(base_url.into()),
            api_url: None,
            api_version: DEFAULT_API_VERSION.to_string(),
            rights_schema: RightsSchema::default(),
        }
    }

    /// Read the configuration from `EMBY_*` environment variables.
    ///
    /// `EMBY_SECRET`, `EMBY_API_TOKEN` and `EMBY_BASE_URL` are required;
    /// `EMBY_ID`, `EMBY_API_URL` and `EMBY_API_VERSION` are optional.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`ChatConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ChatError::ConfigurationError(format!("{key} is not set")))
        };

        let mut config = Self::new(
            required("EMBY_SECRET")?,
            required("EMBY_API_TOKEN")?,
            required("EMBY_BASE_URL")?,
        );
        if let Some(id) = lookup("EMBY_ID").filter(|v| !v.is_empty()) {
            config = config.with_client_id(id);
        }
        if let Some(url) = lookup("EMBY_API_URL").filter(|v| !v.is_empty()) {
            config = config.with_api_url(url);
        }
        if let Some(version) = lookup("EMBY_API_VERSION").filter(|v| !v.is_empty()) {
            config = config.with_api_version(version);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn with_client_id<S: Into<String>>(mut self, client_id: S) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn with_base_url<S: Into<String>>(mut self, url: S) -> Self {
        self.base_url = strip_trailing_slashes(url.into());
        self
    }

    /// Set a separate host for API calls.
    pub fn with_api_url<S: Into<String>>(mut self, url: S) -> Self {
        self.api_url = Some(strip_trailing_slashes(url.into()));
        self
    }

    pub fn with_api_version<S: Into<String>>(mut self, version: S) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn with_rights_schema(mut self, schema: RightsSchema) -> Self {
        self.rights_schema = schema;
        self
    }

    /// Base URL shared chat links point at.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Host for API calls; falls back to the base URL.
    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(&self.base_url)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.client_secret.expose_secret().is_empty() {
            return Err(ChatError::ConfigurationError(
                "Client secret cannot be empty".to_string(),
            ));
        }

        for (name, url) in [("Base URL", self.base_url.as_str()), ("API URL", self.api_url())] {
            if url.is_empty() {
                return Err(ChatError::ConfigurationError(format!(
                    "{name} cannot be empty"
                )));
            }
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ChatError::ConfigurationError(format!(
                    "{name} must start with http:// or https://"
                )));
            }
        }

        if self.api_version.is_empty() || self.api_version.contains('/') {
            return Err(ChatError::ConfigurationError(format!(
                "Invalid API version '{}'",
                self.api_version
            )));
        }

        Ok(())
    }
}

fn strip_trailing_slashes(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
