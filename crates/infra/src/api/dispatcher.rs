//! Authenticated request dispatcher
//!
//! Every resource call goes through [`RequestDispatcher::send`]:
//!
//! 1. Past the retry bound → `Max depth reached`
//! 2. No token → `Access token not found` (no network call)
//! 3. Call `{base_url}/v4/{firm_id}{path}` with a per-attempt deadline
//! 4. `401` → invalidate the token, bump the retry counter, go to 1
//! 5. `DELETE` + `204` → `{}`, otherwise the parsed body as-is
//!
//! The dispatcher never returns `Err`; failures become tagged envelopes.

use std::sync::Arc;
use std::time::Duration;

use parasut_domain::constants::{MAX_RETRIES, REQUEST_TIMEOUT_SECS};
use parasut_domain::{
    Credentials, HttpMethod, LocalFailure, ParasutError, RequestDescriptor, ResponseEnvelope,
    Result,
};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::auth::AccessTokenProvider;
use crate::errors::InfraError;
use crate::http::HttpClient;

/// Dispatcher tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Deadline for one attempt, body included.
    pub timeout: Duration,
    /// Unauthorized retries after the first attempt.
    pub max_retries: u32,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self { timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS), max_retries: MAX_RETRIES }
    }
}

/// How one attempt ended.
enum Attempt {
    Finished(ResponseEnvelope),
    Unauthorized,
}

pub struct RequestDispatcher {
    http_client: HttpClient,
    auth: Arc<dyn AccessTokenProvider>,
    credentials: Arc<Credentials>,
    config: DispatcherConfig,
}

impl RequestDispatcher {
    /// # Errors
    /// Returns `ParasutError::Config` if the HTTP client cannot be built.
    pub fn new(
        credentials: Arc<Credentials>,
        auth: Arc<dyn AccessTokenProvider>,
        config: DispatcherConfig,
    ) -> Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(config.timeout)
            .default_headers(json_headers())
            .build()
            .map_err(|e| ParasutError::Config(format!("Failed to build HttpClient: {e}")))?;

        Ok(Self { http_client, auth, credentials, config })
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    pub fn credentials(&self) -> &Arc<Credentials> {
        &self.credentials
    }

    /// Send one logical request, retrying on 401 up to the configured bound.
    #[instrument(skip(self, descriptor), fields(method = %descriptor.method, path = %descriptor.path))]
    pub async fn send(&self, descriptor: RequestDescriptor) -> ResponseEnvelope {
        let mut retry_count = descriptor.retry_count;

        loop {
            if retry_count > self.config.max_retries {
                warn!(retry_count, "giving up after repeated 401 responses");
                return ResponseEnvelope::Local(LocalFailure::MaxDepth);
            }

            let Some(token) = self.auth.access_token().await else {
                warn!("no access token, request not sent");
                return ResponseEnvelope::Local(LocalFailure::TokenMissing);
            };

            let attempt =
                tokio::time::timeout(self.config.timeout, self.attempt(&descriptor, &token)).await;

            match attempt {
                Ok(Attempt::Finished(envelope)) => return envelope,
                Ok(Attempt::Unauthorized) => {
                    info!(retry_count, "401 from API, invalidating token and retrying");
                    self.auth.invalidate(&token).await;
                    retry_count += 1;
                }
                Err(_) => {
                    warn!(timeout_ms = self.config.timeout.as_millis() as u64, "request timed out");
                    return ResponseEnvelope::Local(LocalFailure::Timeout);
                }
            }
        }
    }

    async fn attempt(&self, descriptor: &RequestDescriptor, token: &str) -> Attempt {
        let url = self.credentials.resource_url(&descriptor.path);

        let mut request = self
            .http_client
            .request(to_reqwest_method(descriptor.method), url)
            .bearer_auth(token);
        if let Some(body) = &descriptor.body {
            request = request.json(body);
        }

        let response = match self.http_client.send(request).await {
            Ok(response) => response,
            Err(err) => return Attempt::Finished(ResponseEnvelope::Local(classify(&err))),
        };

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Attempt::Unauthorized;
        }

        if descriptor.method == HttpMethod::Delete && status == StatusCode::NO_CONTENT {
            debug!("DELETE answered with 204");
            return Attempt::Finished(ResponseEnvelope::empty());
        }

        match read_json(response).await {
            Ok(body) => {
                debug!(status = status.as_u16(), "response received");
                Attempt::Finished(ResponseEnvelope::Remote(body))
            }
            Err(err) => {
                warn!(status = status.as_u16(), error = %err, "response body is not JSON");
                Attempt::Finished(ResponseEnvelope::Local(classify(&err)))
            }
        }
    }
}

async fn read_json(response: reqwest::Response) -> Result<Value> {
    let bytes = response.bytes().await.map_err(|e| ParasutError::from(InfraError::from(e)))?;
    serde_json::from_slice(&bytes).map_err(|e| InfraError::from(e).into())
}

fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

fn classify(err: &ParasutError) -> LocalFailure {
    match err {
        ParasutError::Timeout(_) => LocalFailure::Timeout,
        _ => LocalFailure::TransportError,
    }
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}
