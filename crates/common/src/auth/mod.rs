//! OAuth 2.0 password-grant token lifecycle
//!
//! ```text
//! ┌─────────────────┐
//! │  TokenManager   │  Owns the cached TokenSet, single in-flight exchange
//! └────────┬────────┘
//!          │
//!          └──► TokenEndpoint      (trait seam)
//!                    │
//!                    └──► OAuthClient   (reqwest, POST {base}/oauth/token)
//! ```
//!
//! The manager never fails towards the dispatcher: every authentication
//! problem collapses into "no token available" (`None`).

pub mod client;
pub mod token_manager;
pub mod traits;
pub mod types;

pub use client::{OAuthClient, OAuthClientError};
pub use token_manager::{TokenManager, TokenManagerError};
pub use traits::TokenEndpoint;
pub use types::{GrantRequest, OAuthError, TokenEndpointResponse, TokenResponse, TokenSet};
