//! Seam between the token manager and the token endpoint
//!
//! Lets the manager be exercised against a scripted endpoint in tests and
//! keeps HTTP details out of the token lifecycle.

use async_trait::async_trait;
use parasut_domain::Credentials;

use super::client::OAuthClientError;
use super::types::TokenEndpointResponse;

/// Operations against `POST {base_url}/oauth/token`
#[async_trait]
pub trait TokenEndpoint: Send + Sync {
    /// Password grant.
    ///
    /// The body is parsed whatever the HTTP status, so a rejection arrives as
    /// `Ok(TokenEndpointResponse::Rejected(..))`.
    ///
    /// # Errors
    /// Returns error if the call fails in transit, times out, or the body is
    /// not a token or error document.
    async fn password_grant(
        &self,
        credentials: &Credentials,
    ) -> Result<TokenEndpointResponse, OAuthClientError>;

    /// Refresh grant.
    ///
    /// # Errors
    /// Returns error on transport failure, timeout, an unparsable body, or a
    /// non-success status (`OAuthClientError::Status`).
    async fn refresh_grant(
        &self,
        credentials: &Credentials,
        refresh_token: &str,
    ) -> Result<TokenEndpointResponse, OAuthClientError>;
}
