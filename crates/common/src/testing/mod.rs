//! Test doubles shared by the workspace's test suites
//!
//! Compiled with the `platform` tier so downstream test suites can reach
//! them through a dev-dependency.

pub mod mocks;
pub mod time;

pub use mocks::{issued, rejected, MockTokenEndpoint};
pub use time::MockClock;
