//! Client configuration and validated credentials

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{API_VERSION_PREFIX, DEFAULT_BASE_URL, TOKEN_PATH};
use crate::errors::{ParasutError, Result};

/// Raw configuration as supplied by the application (code, env or file).
///
/// Fields may be empty here; [`Credentials::from_config`] is the validation
/// gate that runs before any network call.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParasutConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    /// Login e-mail, sent as `username` in the password grant.
    pub email: String,
    pub password: String,
    /// Defaults to [`DEFAULT_BASE_URL`] when absent or blank.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    pub firm_id: String,
}

impl fmt::Debug for ParasutConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParasutConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("firm_id", &self.firm_id)
            .finish()
    }
}

/// Immutable, validated credentials shared by the token manager and the
/// dispatcher.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    username: String,
    password: String,
    base_url: String,
    firm_id: String,
}

impl Credentials {
    /// Validate a configuration and freeze it into credentials.
    ///
    /// # Errors
    /// Returns `ParasutError::Config` if a required field is blank or the
    /// base URL is not an absolute http(s) URL.
    pub fn from_config(config: ParasutConfig) -> Result<Self> {
        let ParasutConfig {
            client_id,
            client_secret,
            redirect_uri,
            email,
            password,
            base_url,
            firm_id,
        } = config;

        if email.trim().is_empty() || password.is_empty() {
            return Err(ParasutError::Config("Email and password are required".into()));
        }
        if client_id.trim().is_empty() || client_secret.is_empty() {
            return Err(ParasutError::Config("Client id and secret are required".into()));
        }
        if redirect_uri.trim().is_empty() {
            return Err(ParasutError::Config("Redirect uri is required".into()));
        }
        if firm_id.trim().is_empty() {
            return Err(ParasutError::Config("Firm id is required".into()));
        }

        let base_url = normalize_base_url(base_url.as_deref())?;

        Ok(Self {
            client_id,
            client_secret,
            redirect_uri,
            username: email,
            password,
            base_url,
            firm_id: firm_id.trim().to_string(),
        })
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn firm_id(&self) -> &str {
        &self.firm_id
    }

    /// `{base_url}/oauth/token`
    #[must_use]
    pub fn token_url(&self) -> String {
        format!("{}{}", self.base_url, TOKEN_PATH)
    }

    /// `{base_url}/v4/{firm_id}{path}`
    ///
    /// `path` is appended verbatim, query string included.
    #[must_use]
    pub fn resource_url(&self, path: &str) -> String {
        format!("{}{}{}{}", self.base_url, API_VERSION_PREFIX, self.firm_id, path)
    }
}

impl TryFrom<ParasutConfig> for Credentials {
    type Error = ParasutError;

    fn try_from(config: ParasutConfig) -> Result<Self> {
        Self::from_config(config)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("firm_id", &self.firm_id)
            .finish()
    }
}

fn normalize_base_url(raw: Option<&str>) -> Result<String> {
    let candidate = match raw.map(str::trim) {
        Some(value) if !value.is_empty() => value,
        _ => DEFAULT_BASE_URL,
    };

    let parsed = url::Url::parse(candidate)
        .map_err(|e| ParasutError::Config(format!("Invalid base url '{candidate}': {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ParasutError::Config(format!(
            "Unsupported base url scheme '{}'",
            parsed.scheme()
        )));
    }

    Ok(candidate.trim_end_matches('/').to_string())
}
