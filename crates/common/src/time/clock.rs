use chrono::{DateTime, Utc};

/// Source of the current wall-clock time.
pub trait Clock: Send + Sync {
    /// Current time as a UTC timestamp.
    fn now_utc(&self) -> DateTime<Utc>;

    /// Seconds since the UNIX epoch.
    fn epoch_seconds(&self) -> i64 {
        self.now_utc().timestamp()
    }
}

/// Real system clock. Use this in production code.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
