//! Parasut v4 API access
//!
//! - [`auth`]: access token provisioning (`AccessTokenProvider`)
//! - [`dispatcher`]: the single authenticated request path every resource
//!   client uses

pub mod auth;
pub mod dispatcher;

pub use auth::{AccessTokenProvider, ApiAuthService};
pub use dispatcher::{DispatcherConfig, RequestDispatcher};
