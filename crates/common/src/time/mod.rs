//! Wall-clock abstraction
//!
//! Token freshness is computed in whole epoch seconds, so the clock hands out
//! seconds rather than instants. Tests swap in
//! [`MockClock`](crate::testing::MockClock) to move time without sleeping.

mod clock;

pub use clock::{Clock, SystemClock};
