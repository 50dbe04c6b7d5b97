//! Client entry point
//!
//! [`Parasut`] wires validated credentials, the token manager and the request
//! dispatcher together and exposes the resource groups.
//!
//! ```no_run
//! use parasut_infra::{ListParams, Parasut};
//!
//! # async fn example() -> parasut_domain::Result<()> {
//! let client = Parasut::from_env()?;
//! let invoices = client.sales().get_sales_invoices(&ListParams::new().page(1, 25)).await;
//! println!("{invoices}");
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use parasut_domain::constants::TOKEN_SAFETY_MARGIN_SECS;
use parasut_domain::{Credentials, ParasutConfig, RequestDescriptor, ResponseEnvelope, Result};
use serde_json::Value;
use tracing::{info, warn};

use crate::api::{AccessTokenProvider, ApiAuthService, DispatcherConfig, RequestDispatcher};
use crate::config;
use crate::resources::{Cash, Expenses, Legalize, Sales, Stock, TrackableJobs};

/// Parasut v4 API client
pub struct Parasut {
    auth: Arc<dyn AccessTokenProvider>,
    dispatcher: RequestDispatcher,
}

impl Parasut {
    /// Client with default timeouts and retry bound.
    ///
    /// # Errors
    /// Returns `ParasutError::Config` if a required field is missing or the
    /// base URL is invalid.
    pub fn new(config: ParasutConfig) -> Result<Self> {
        Self::builder(config).build()
    }

    /// Client configured from `PARASUT_*` variables or a config file.
    ///
    /// # Errors
    /// Returns `ParasutError::Config` if no complete configuration is found.
    pub fn from_env() -> Result<Self> {
        Self::new(config::load()?)
    }

    pub fn builder(config: ParasutConfig) -> ParasutBuilder {
        ParasutBuilder::new(config)
    }

    pub fn credentials(&self) -> &Arc<Credentials> {
        self.dispatcher.credentials()
    }

    pub fn dispatcher(&self) -> &RequestDispatcher {
        &self.dispatcher
    }

    pub fn auth(&self) -> &Arc<dyn AccessTokenProvider> {
        &self.auth
    }

    /// Dispatch an arbitrary request and keep the tagged result.
    pub async fn send(&self, descriptor: RequestDescriptor) -> ResponseEnvelope {
        self.dispatcher.send(descriptor).await
    }

    /// Dispatch an arbitrary request and render it as JSON.
    pub async fn request(&self, descriptor: RequestDescriptor) -> Value {
        self.send(descriptor).await.into_value()
    }

    pub fn sales(&self) -> Sales<'_> {
        Sales::new(&self.dispatcher)
    }

    pub fn expenses(&self) -> Expenses<'_> {
        Expenses::new(&self.dispatcher)
    }

    pub fn stock(&self) -> Stock<'_> {
        Stock::new(&self.dispatcher)
    }

    pub fn cash(&self) -> Cash<'_> {
        Cash::new(&self.dispatcher)
    }

    pub fn legalize(&self) -> Legalize<'_> {
        Legalize::new(&self.dispatcher)
    }

    pub fn trackable_jobs(&self) -> TrackableJobs<'_> {
        TrackableJobs::new(&self.dispatcher)
    }
}

/// Builder for [`Parasut`]
pub struct ParasutBuilder {
    config: ParasutConfig,
    dispatcher: DispatcherConfig,
    safety_margin_seconds: Option<i64>,
    token_timeout: Option<Duration>,
    auth: Option<Arc<dyn AccessTokenProvider>>,
}

impl ParasutBuilder {
    fn new(config: ParasutConfig) -> Self {
        Self {
            config,
            dispatcher: DispatcherConfig::default(),
            safety_margin_seconds: None,
            token_timeout: None,
            auth: None,
        }
    }

    /// Per-attempt deadline for resource calls (default 5 s).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.dispatcher.timeout = timeout;
        self
    }

    /// Unauthorized retries after the first attempt (default 3).
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.dispatcher.max_retries = max_retries;
        self
    }

    /// Seconds before expiry at which a token counts as stale (default 200).
    pub fn safety_margin(mut self, seconds: i64) -> Self {
        self.safety_margin_seconds = Some(seconds);
        self
    }

    /// Deadline for token endpoint calls; defaults to the resource timeout.
    pub fn token_timeout(mut self, timeout: Duration) -> Self {
        self.token_timeout = Some(timeout);
        self
    }

    /// Replace the built-in token manager.
    ///
    /// The injected provider owns its own token policy: `safety_margin` and
    /// `token_timeout` are ignored when this is set.
    pub fn auth(mut self, auth: Arc<dyn AccessTokenProvider>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// # Errors
    /// Returns `ParasutError::Config` if the configuration is invalid or an
    /// HTTP client cannot be built.
    pub fn build(self) -> Result<Parasut> {
        let credentials = Arc::new(Credentials::from_config(self.config)?);

        let auth: Arc<dyn AccessTokenProvider> = match self.auth {
            Some(auth) => {
                if self.safety_margin_seconds.is_some() || self.token_timeout.is_some() {
                    warn!("token settings ignored, an access token provider was injected");
                }
                auth
            }
            None => {
                let token_timeout = self.token_timeout.unwrap_or(self.dispatcher.timeout);
                let safety_margin =
                    self.safety_margin_seconds.unwrap_or(TOKEN_SAFETY_MARGIN_SECS);
                Arc::new(
                    ApiAuthService::with_token_timeout(Arc::clone(&credentials), token_timeout)?
                        .with_safety_margin(safety_margin),
                )
            }
        };

        let dispatcher =
            RequestDispatcher::new(Arc::clone(&credentials), Arc::clone(&auth), self.dispatcher)?;

        info!(
            base_url = credentials.base_url(),
            firm_id = credentials.firm_id(),
            "Parasut client ready"
        );
        Ok(Parasut { auth, dispatcher })
    }
}
