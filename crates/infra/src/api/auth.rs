//! Access token provisioning for the dispatcher
//!
//! The dispatcher only needs two things from authentication: a token to put
//! in the `Authorization` header, and a way to report that the API rejected
//! it.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parasut_common::auth::{OAuthClient, TokenEndpoint, TokenManager, TokenSet};
use parasut_common::time::{Clock, SystemClock};
use parasut_domain::constants::REQUEST_TIMEOUT_SECS;
use parasut_domain::{Credentials, ParasutError, Result};
use tracing::debug;

/// Trait for providing access tokens
///
/// This trait allows dependency injection and testing with mock providers.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// A valid access token, or `None` when none can be obtained.
    async fn access_token(&self) -> Option<String>;

    /// The API answered 401 to a request carrying `token`.
    async fn invalidate(&self, token: &str);
}

/// Credentials plus the token manager that serves them.
pub struct ApiAuthService<E: TokenEndpoint + 'static = OAuthClient, C: Clock + 'static = SystemClock>
{
    credentials: Arc<Credentials>,
    manager: TokenManager<E, C>,
}

impl ApiAuthService<OAuthClient, SystemClock> {
    /// Service talking to `{base_url}/oauth/token` with the default deadline.
    ///
    /// # Errors
    /// Returns `ParasutError::Config` if the HTTP client cannot be built.
    pub fn new(credentials: Arc<Credentials>) -> Result<Self> {
        Self::with_token_timeout(credentials, Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    /// # Errors
    /// Returns `ParasutError::Config` if the HTTP client cannot be built.
    pub fn with_token_timeout(credentials: Arc<Credentials>, timeout: Duration) -> Result<Self> {
        let endpoint = OAuthClient::with_timeout(timeout)
            .map_err(|e| ParasutError::Config(format!("Failed to build OAuth client: {e}")))?;
        Ok(Self::with_endpoint(credentials, endpoint, SystemClock))
    }
}

impl<E: TokenEndpoint + 'static, C: Clock + 'static> ApiAuthService<E, C> {
    /// Service over any token endpoint and clock.
    pub fn with_endpoint(credentials: Arc<Credentials>, endpoint: E, clock: C) -> Self {
        let manager = TokenManager::with_clock(endpoint, Arc::clone(&credentials), clock);
        Self { credentials, manager }
    }

    /// Override the staleness margin (seconds before expiry).
    #[must_use]
    pub fn with_safety_margin(mut self, seconds: i64) -> Self {
        self.manager = self.manager.with_safety_margin(seconds);
        self
    }

    pub fn credentials(&self) -> &Arc<Credentials> {
        &self.credentials
    }

    pub fn token_manager(&self) -> &TokenManager<E, C> {
        &self.manager
    }

    /// Snapshot of the cached token state.
    pub async fn token_state(&self) -> Option<TokenSet> {
        self.manager.current_state().await
    }

    /// Drop the cached tokens.
    pub async fn logout(&self) {
        self.manager.clear().await;
    }
}

#[async_trait]
impl<E: TokenEndpoint + 'static, C: Clock + 'static> AccessTokenProvider for ApiAuthService<E, C> {
    async fn access_token(&self) -> Option<String> {
        self.manager.get_valid_token().await
    }

    async fn invalidate(&self, token: &str) {
        debug!("access token rejected by API");
        self.manager.invalidate(token).await;
    }
}
