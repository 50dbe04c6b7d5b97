//! Token manager with transparent refresh
//!
//! Manages the password-grant token lifecycle:
//! - Acquisition on first use
//! - Reuse while fresh (`now - created_at < expires_in - safety margin`)
//! - Refresh grant once stale, falling back to a new password grant
//! - Invalidation of a token the API rejected with 401

use std::sync::Arc;

use parasut_domain::constants::TOKEN_SAFETY_MARGIN_SECS;
use parasut_domain::Credentials;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument, warn};

use super::client::OAuthClientError;
use super::traits::TokenEndpoint;
use super::types::{OAuthError, TokenEndpointResponse, TokenSet};
use crate::time::{Clock, SystemClock};

/// Error type for token manager operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenManagerError {
    /// Token endpoint call failed
    OAuthError(OAuthClientError),

    /// Token endpoint answered with an error document
    Rejected(OAuthError),

    /// Token endpoint issued an empty access token
    EmptyToken,
}

impl std::fmt::Display for TokenManagerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OAuthError(e) => write!(f, "OAuth error: {e}"),
            Self::Rejected(e) => write!(f, "Authentication rejected: {e}"),
            Self::EmptyToken => write!(f, "Token endpoint issued an empty access token"),
        }
    }
}

impl std::error::Error for TokenManagerError {}

impl From<OAuthClientError> for TokenManagerError {
    fn from(err: OAuthClientError) -> Self {
        Self::OAuthError(err)
    }
}

#[derive(Debug, Clone)]
struct CachedToken {
    tokens: TokenSet,
    /// Set when the API rejected this access token.
    invalidated: bool,
}

/// Owns the current [`TokenSet`] for one set of credentials.
///
/// Reads go through an `RwLock`; every token endpoint exchange runs behind a
/// single async mutex so concurrent callers holding a stale token wait for
/// one exchange instead of issuing their own.
pub struct TokenManager<E: TokenEndpoint + 'static, C: Clock + 'static = SystemClock> {
    endpoint: Arc<E>,
    clock: Arc<C>,
    credentials: Arc<Credentials>,
    current: Arc<RwLock<Option<CachedToken>>>,
    exchange_guard: Mutex<()>,
    safety_margin_seconds: i64,
}

impl<E: TokenEndpoint + 'static> TokenManager<E, SystemClock> {
    /// Manager on the system clock with the default 200 second margin.
    #[must_use]
    pub fn new(endpoint: E, credentials: Arc<Credentials>) -> Self {
        Self::with_clock(endpoint, credentials, SystemClock)
    }
}

impl<E: TokenEndpoint + 'static, C: Clock + 'static> TokenManager<E, C> {
    #[must_use]
    pub fn with_clock(endpoint: E, credentials: Arc<Credentials>, clock: C) -> Self {
        Self {
            endpoint: Arc::new(endpoint),
            clock: Arc::new(clock),
            credentials,
            current: Arc::new(RwLock::new(None)),
            exchange_guard: Mutex::new(()),
            safety_margin_seconds: TOKEN_SAFETY_MARGIN_SECS,
        }
    }

    /// Override the staleness margin (seconds before expiry).
    #[must_use]
    pub fn with_safety_margin(mut self, seconds: i64) -> Self {
        self.safety_margin_seconds = seconds;
        self
    }

    pub fn safety_margin(&self) -> i64 {
        self.safety_margin_seconds
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// A currently valid access token, or `None` when none can be obtained.
    ///
    /// Never fails: every authentication problem is logged and reported as
    /// `None`.
    pub async fn get_valid_token(&self) -> Option<String> {
        match self.try_access_token().await {
            Ok(token) => Some(token),
            Err(e) => {
                warn!(error = %e, "no access token available");
                None
            }
        }
    }

    /// Like [`get_valid_token`](Self::get_valid_token) but keeps the reason
    /// for failure.
    ///
    /// # Errors
    /// Returns error if acquisition fails, or if the refresh grant answers
    /// with an error document or an unreadable body.
    #[instrument(skip(self))]
    pub async fn try_access_token(&self) -> Result<String, TokenManagerError> {
        if let Some(token) = self.fresh_token().await {
            debug!("reusing cached access token");
            return Ok(token);
        }

        let _guard = self.exchange_guard.lock().await;

        // Another caller may have finished an exchange while we waited.
        if let Some(token) = self.fresh_token().await {
            debug!("access token renewed by a concurrent caller");
            return Ok(token);
        }

        let refresh_token =
            self.current.read().await.as_ref().map(|cached| cached.tokens.refresh_token.clone());

        let tokens = match refresh_token {
            None => self.acquire_locked().await?,
            Some(refresh_token) => self.refresh_or_reacquire(&refresh_token).await?,
        };
        Ok(tokens.access_token)
    }

    /// Run a password grant and store the result.
    ///
    /// # Errors
    /// Returns error if the endpoint call fails, the endpoint answers with an
    /// error document, or the issued access token is empty.
    pub async fn acquire(&self) -> Result<TokenSet, TokenManagerError> {
        let _guard = self.exchange_guard.lock().await;
        self.acquire_locked().await
    }

    /// Mark the cached state stale if it still holds `access_token`.
    ///
    /// A token that was already replaced is left alone, so a late 401 from
    /// an older request cannot throw away a newer token.
    pub async fn invalidate(&self, access_token: &str) {
        let mut current = self.current.write().await;
        if let Some(cached) = current.as_mut() {
            if cached.tokens.access_token == access_token {
                cached.invalidated = true;
                info!("cached access token invalidated");
            } else {
                debug!("ignoring invalidation of a token that was already replaced");
            }
        }
    }

    /// Snapshot of the cached token state.
    pub async fn current_state(&self) -> Option<TokenSet> {
        self.current.read().await.as_ref().map(|cached| cached.tokens.clone())
    }

    /// Whether a fresh token is cached.
    pub async fn is_authenticated(&self) -> bool {
        self.fresh_token().await.is_some()
    }

    /// Forget the cached state; the next call runs a password grant.
    pub async fn clear(&self) {
        *self.current.write().await = None;
        info!("token state cleared");
    }

    async fn fresh_token(&self) -> Option<String> {
        let now = self.clock.epoch_seconds();
        let current = self.current.read().await;
        current
            .as_ref()
            .filter(|cached| {
                !cached.invalidated && cached.tokens.is_fresh(now, self.safety_margin_seconds)
            })
            .map(|cached| {
                let remaining = cached.tokens.seconds_until_stale(now, self.safety_margin_seconds);
                debug!(seconds_until_stale = remaining, "cached access token is fresh");
                cached.tokens.access_token.clone()
            })
    }

    async fn acquire_locked(&self) -> Result<TokenSet, TokenManagerError> {
        let response = self.endpoint.password_grant(&self.credentials).await?;
        let tokens = self.accept(response).await?;
        info!(expires_in = tokens.expires_in, "access token acquired with password grant");
        Ok(tokens)
    }

    async fn refresh_or_reacquire(&self, refresh_token: &str) -> Result<TokenSet, TokenManagerError> {
        match self.endpoint.refresh_grant(&self.credentials, refresh_token).await {
            Ok(response) => {
                let tokens = self.accept(response).await?;
                info!(expires_in = tokens.expires_in, "access token refreshed");
                Ok(tokens)
            }
            // A success status with an unreadable body is not a failed refresh.
            Err(e @ OAuthClientError::ParseError(_)) => {
                warn!(error = %e, "refresh grant returned an unreadable body");
                Err(e.into())
            }
            Err(e) => {
                warn!(error = %e, "refresh grant failed, falling back to password grant");
                self.acquire_locked().await
            }
        }
    }

    /// Turn an endpoint answer into stored state.
    async fn accept(&self, response: TokenEndpointResponse) -> Result<TokenSet, TokenManagerError> {
        let issued = match response {
            TokenEndpointResponse::Rejected(error) => return Err(TokenManagerError::Rejected(error)),
            TokenEndpointResponse::Issued(issued) if issued.access_token.is_empty() => {
                return Err(TokenManagerError::EmptyToken);
            }
            TokenEndpointResponse::Issued(issued) => issued,
        };

        let tokens = TokenSet::from_response(issued, self.clock.epoch_seconds());
        *self.current.write().await =
            Some(CachedToken { tokens: tokens.clone(), invalidated: false });
        Ok(tokens)
    }
}
