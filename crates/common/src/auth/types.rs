//! Token endpoint payloads and the cached token state

use std::fmt;

use serde::{Deserialize, Serialize};

use parasut_domain::Credentials;

/// Access/refresh token pair as held by the token manager.
///
/// Always fully populated: the manager replaces the whole value in one
/// assignment.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSet {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    /// Epoch seconds on the local clock when the token was received.
    pub created_at: i64,
}

impl TokenSet {
    /// Build from an endpoint response, stamped with the local clock.
    ///
    /// Any `created_at` sent by the server is ignored.
    #[must_use]
    pub fn from_response(response: TokenResponse, created_at: i64) -> Self {
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            token_type: response.token_type,
            expires_in: response.expires_in,
            created_at,
        }
    }

    /// `now - created_at < expires_in - safety_margin`
    #[must_use]
    pub fn is_fresh(&self, now: i64, safety_margin: i64) -> bool {
        now.saturating_sub(self.created_at) < self.expires_in.saturating_sub(safety_margin)
    }

    /// Seconds left before the token stops being fresh; negative once stale.
    #[must_use]
    pub fn seconds_until_stale(&self, now: i64, safety_margin: i64) -> i64 {
        self.expires_in.saturating_sub(safety_margin).saturating_sub(now - self.created_at)
    }
}

impl fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSet")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Successful body of `POST /oauth/token`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub expires_in: i64,
    pub refresh_token: String,
    #[serde(default)]
    pub created_at: Option<i64>,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Error body of `POST /oauth/token`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OAuthError {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}

impl fmt::Display for OAuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error_description {
            Some(description) => write!(f, "{}: {description}", self.error),
            None => write!(f, "{}", self.error),
        }
    }
}

/// Either body the token endpoint can answer with.
///
/// A body carrying `error` is treated as a rejection even if it also has
/// token fields.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TokenEndpointResponse {
    Rejected(OAuthError),
    Issued(TokenResponse),
}

/// JSON body sent to the token endpoint.
#[derive(Serialize)]
#[serde(tag = "grant_type", rename_all = "snake_case")]
pub enum GrantRequest<'a> {
    Password {
        username: &'a str,
        password: &'a str,
        client_id: &'a str,
        client_secret: &'a str,
        redirect_uri: &'a str,
    },
    RefreshToken {
        refresh_token: &'a str,
        client_id: &'a str,
        client_secret: &'a str,
    },
}

impl<'a> GrantRequest<'a> {
    pub fn password(credentials: &'a Credentials) -> Self {
        Self::Password {
            username: credentials.username(),
            password: credentials.password(),
            client_id: credentials.client_id(),
            client_secret: credentials.client_secret(),
            redirect_uri: credentials.redirect_uri(),
        }
    }

    pub fn refresh(credentials: &'a Credentials, refresh_token: &'a str) -> Self {
        Self::RefreshToken {
            refresh_token,
            client_id: credentials.client_id(),
            client_secret: credentials.client_secret(),
        }
    }

    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Password { .. } => "password",
            Self::RefreshToken { .. } => "refresh_token",
        }
    }
}
