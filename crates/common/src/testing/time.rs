//! Controllable clock for deterministic tests
//!
//! ```
//! use std::time::Duration;
//!
//! use parasut_common::testing::MockClock;
//! use parasut_common::time::Clock;
//!
//! let clock = MockClock::at_epoch(1_000);
//! clock.advance(Duration::from_secs(5));
//! assert_eq!(clock.epoch_seconds(), 1_005);
//! ```

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};

use crate::time::Clock;

/// Mock clock whose time only moves when told to.
///
/// Clones share the same underlying time, so a test can keep one handle and
/// give another to the code under test.
#[derive(Debug, Clone)]
pub struct MockClock {
    epoch_seconds: Arc<Mutex<i64>>,
}

impl MockClock {
    /// Start at the current real time.
    pub fn new() -> Self {
        Self::at_epoch(Utc::now().timestamp())
    }

    /// Start at a fixed number of seconds since the UNIX epoch.
    pub fn at_epoch(epoch_seconds: i64) -> Self {
        Self { epoch_seconds: Arc::new(Mutex::new(epoch_seconds)) }
    }

    /// Move time forward.
    pub fn advance(&self, duration: Duration) {
        let secs = i64::try_from(duration.as_secs()).unwrap_or(i64::MAX);
        let mut now = self.epoch_seconds.lock().unwrap_or_else(PoisonError::into_inner);
        *now = now.saturating_add(secs);
    }

    /// Jump to an absolute epoch second.
    pub fn set_epoch(&self, epoch_seconds: i64) {
        *self.epoch_seconds.lock().unwrap_or_else(PoisonError::into_inner) = epoch_seconds;
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now_utc(&self) -> DateTime<Utc> {
        let secs = *self.epoch_seconds.lock().unwrap_or_else(PoisonError::into_inner);
        Utc.timestamp_opt(secs, 0).single().unwrap_or_else(Utc::now)
    }

    fn epoch_seconds(&self) -> i64 {
        *self.epoch_seconds.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
