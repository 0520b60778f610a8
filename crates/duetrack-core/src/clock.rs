//! Wall-clock access.
//!
//! Every time-dependent computation takes its "now" from a `Clock` so that
//! streak and priority behavior can be pinned in tests.

use chrono::{DateTime, Duration, FixedOffset, Local};
use parking_lot::Mutex;

/// Source of the current local time.
pub trait Clock: Send + Sync {
    /// Current instant, carrying the local UTC offset used for calendar days.
    fn now(&self) -> DateTime<FixedOffset>;
}

/// The system's local clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// A clock frozen at a settable instant.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<FixedOffset>>,
}

impl FixedClock {
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Parse an RFC 3339 timestamp, e.g. `2026-01-20T09:00:00+02:00`.
    pub fn at(rfc3339: &str) -> Result<Self, chrono::ParseError> {
        Ok(Self::new(DateTime::parse_from_rfc3339(rfc3339)?))
    }

    pub fn set(&self, now: DateTime<FixedOffset>) {
        *self.now.lock() = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now = *now + by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        *self.now.lock()
    }
}
