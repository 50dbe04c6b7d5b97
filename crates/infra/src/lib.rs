//! # Parasut Infrastructure
//!
//! The I/O side of the Parasut v4 client.
//!
//! This crate contains:
//! - The authenticated request dispatcher and its access token provider
//! - The HTTP transport
//! - Configuration loading (environment, JSON, TOML)
//! - Resource clients (sales, expenses, stock, cash, legalize, trackable jobs)
//! - The [`Parasut`] facade that wires them together
//!
//! ## Architecture
//! - Token lifecycle lives in `parasut-common` (`TokenManager`)
//! - Types and validation live in `parasut-domain`
//! - Runtime failures are values (`ResponseEnvelope`), only configuration
//!   problems are `Err`

pub mod api;
pub mod client;
pub mod config;
pub mod errors;
pub mod http;
pub mod resources;

// Re-export commonly used items
pub use api::{AccessTokenProvider, ApiAuthService, DispatcherConfig, RequestDispatcher};
pub use client::{Parasut, ParasutBuilder};
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use resources::{ListParams, Page};
