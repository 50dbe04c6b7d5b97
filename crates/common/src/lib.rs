//! Shared building blocks for the Parasut client crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: clock abstraction
//! - `runtime`: async infrastructure and tracing
//! - `platform`: token endpoint client and token manager (auth)
//! - `test-utils`: alias of `platform` for dev-dependencies; the mock clock
//!   and scripted token endpoint live in [`testing`]

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod time;

// Platform tier
// -------------------------------------------------------------------
#[cfg(feature = "platform")]
pub mod auth;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(any(feature = "platform", feature = "test-utils", test))]
pub mod testing;

#[cfg(feature = "platform")]
pub use auth::{
    OAuthClient, OAuthClientError, TokenEndpoint, TokenManager, TokenManagerError, TokenSet,
};
#[cfg(feature = "foundation")]
pub use time::{Clock, SystemClock};
