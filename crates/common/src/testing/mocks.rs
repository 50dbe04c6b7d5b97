//! Scripted token endpoint

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use parasut_domain::Credentials;

use crate::auth::{OAuthClientError, OAuthError, TokenEndpoint, TokenEndpointResponse, TokenResponse};

type Scripted = Result<TokenEndpointResponse, OAuthClientError>;

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Successful grant answer.
pub fn issued(access_token: &str, refresh_token: &str, expires_in: i64) -> TokenEndpointResponse {
    TokenEndpointResponse::Issued(TokenResponse {
        access_token: access_token.to_string(),
        token_type: "bearer".to_string(),
        expires_in,
        refresh_token: refresh_token.to_string(),
        created_at: None,
    })
}

/// Error-document grant answer.
pub fn rejected(error: &str, description: &str) -> TokenEndpointResponse {
    TokenEndpointResponse::Rejected(OAuthError {
        error: error.to_string(),
        error_description: Some(description.to_string()),
    })
}

/// Token endpoint that replays queued answers and counts calls.
///
/// When a queue runs dry, grants succeed with `password-N`/`refresh-N`
/// tokens valid for two hours. Clones share queues and counters.
#[derive(Debug, Clone, Default)]
pub struct MockTokenEndpoint {
    password_script: Arc<Mutex<VecDeque<Scripted>>>,
    refresh_script: Arc<Mutex<VecDeque<Scripted>>>,
    password_calls: Arc<AtomicUsize>,
    refresh_calls: Arc<AtomicUsize>,
    refresh_tokens_seen: Arc<Mutex<Vec<String>>>,
    delay: Option<Duration>,
}

impl MockTokenEndpoint {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep this long inside every grant, to let concurrent callers pile up.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn push_password(&self, answer: Scripted) {
        locked(&self.password_script).push_back(answer);
    }

    pub fn push_refresh(&self, answer: Scripted) {
        locked(&self.refresh_script).push_back(answer);
    }

    pub fn password_calls(&self) -> usize {
        self.password_calls.load(Ordering::SeqCst)
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    /// Refresh tokens presented so far, in call order.
    pub fn refresh_tokens_seen(&self) -> Vec<String> {
        locked(&self.refresh_tokens_seen).clone()
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl TokenEndpoint for MockTokenEndpoint {
    async fn password_grant(&self, _credentials: &Credentials) -> Scripted {
        let n = self.password_calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.pause().await;
        let scripted = locked(&self.password_script).pop_front();
        scripted.unwrap_or_else(|| {
            Ok(issued(&format!("password-{n}"), &format!("refresh-{n}"), 7200))
        })
    }

    async fn refresh_grant(&self, _credentials: &Credentials, refresh_token: &str) -> Scripted {
        let n = self.refresh_calls.fetch_add(1, Ordering::SeqCst) + 1;
        locked(&self.refresh_tokens_seen).push(refresh_token.to_string());
        self.pause().await;
        let scripted = locked(&self.refresh_script).pop_front();
        scripted.unwrap_or_else(|| {
            Ok(issued(&format!("refreshed-{n}"), &format!("refresh-r{n}"), 7200))
        })
    }
}
