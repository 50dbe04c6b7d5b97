//! # Parasut Domain
//!
//! Domain types shared by the Parasut client crates.
//!
//! This crate contains:
//! - Client configuration and validated credentials
//! - The response envelope returned by the request dispatcher
//! - Domain error types and Result definitions
//! - Protocol constants (endpoints, retry bounds, deadlines)
//!
//! ## Architecture
//! - No dependencies on other Parasut crates
//! - No I/O; pure data and validation

pub mod config;
pub mod constants;
pub mod envelope;
pub mod errors;

// Re-export commonly used items
pub use config::{Credentials, ParasutConfig};
pub use envelope::{ErrorDetail, HttpMethod, LocalFailure, RequestDescriptor, ResponseEnvelope};
pub use errors::*;
