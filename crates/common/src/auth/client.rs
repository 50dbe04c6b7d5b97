//! HTTP token endpoint client
//!
//! Both grants are JSON `POST`s to `{base_url}/oauth/token`, bounded by the
//! same per-call deadline as resource requests.

use std::time::Duration;

use async_trait::async_trait;
use parasut_domain::constants::REQUEST_TIMEOUT_SECS;
use parasut_domain::Credentials;
use reqwest::{Client, StatusCode};
use tracing::{debug, instrument};

use super::traits::TokenEndpoint;
use super::types::{GrantRequest, TokenEndpointResponse};

/// Error type for token endpoint calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OAuthClientError {
    /// Connection or protocol failure
    RequestFailed(String),

    /// The call exceeded its deadline
    Timeout,

    /// Non-success status on a grant that requires one
    Status { status: u16, body: String },

    /// Body is neither a token nor an error document
    ParseError(String),

    /// HTTP client could not be constructed
    ConfigError(String),
}

impl std::fmt::Display for OAuthClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RequestFailed(e) => write!(f, "HTTP request failed: {e}"),
            Self::Timeout => write!(f, "Token request timed out"),
            Self::Status { status, body } => write!(f, "Token endpoint returned {status}: {body}"),
            Self::ParseError(msg) => write!(f, "Parse error: {msg}"),
            Self::ConfigError(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for OAuthClientError {}

impl From<reqwest::Error> for OAuthClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::ParseError(err.to_string())
        } else {
            Self::RequestFailed(err.to_string())
        }
    }
}

/// Token endpoint client backed by `reqwest`
#[derive(Debug, Clone)]
pub struct OAuthClient {
    client: Client,
}

impl OAuthClient {
    /// Client with the default 5 second deadline.
    ///
    /// # Errors
    /// Returns error if the TLS backend cannot be initialised.
    pub fn new() -> Result<Self, OAuthClientError> {
        Self::with_timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    /// # Errors
    /// Returns error if the TLS backend cannot be initialised.
    pub fn with_timeout(timeout: Duration) -> Result<Self, OAuthClientError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OAuthClientError::ConfigError(e.to_string()))?;
        Ok(Self { client })
    }

    /// Wrap an existing client (its own timeout applies).
    #[must_use]
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    async fn post_grant(
        &self,
        credentials: &Credentials,
        grant: &GrantRequest<'_>,
    ) -> Result<(StatusCode, String), OAuthClientError> {
        let response = self.client.post(credentials.token_url()).json(grant).send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(grant = grant.kind(), status = status.as_u16(), "token endpoint responded");
        Ok((status, body))
    }
}

fn parse_body(body: &str) -> Result<TokenEndpointResponse, OAuthClientError> {
    serde_json::from_str(body).map_err(|e| OAuthClientError::ParseError(e.to_string()))
}

#[async_trait]
impl TokenEndpoint for OAuthClient {
    #[instrument(skip_all, fields(username = credentials.username()))]
    async fn password_grant(
        &self,
        credentials: &Credentials,
    ) -> Result<TokenEndpointResponse, OAuthClientError> {
        let (_, body) = self.post_grant(credentials, &GrantRequest::password(credentials)).await?;
        parse_body(&body)
    }

    #[instrument(skip_all)]
    async fn refresh_grant(
        &self,
        credentials: &Credentials,
        refresh_token: &str,
    ) -> Result<TokenEndpointResponse, OAuthClientError> {
        let grant = GrantRequest::refresh(credentials, refresh_token);
        let (status, body) = self.post_grant(credentials, &grant).await?;
        if !status.is_success() {
            return Err(OAuthClientError::Status { status: status.as_u16(), body });
        }
        parse_body(&body)
    }
}
