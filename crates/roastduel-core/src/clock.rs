//! Clock abstraction so duel selection windows are testable.

use chrono::{DateTime, Duration, Utc};

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;

    /// Whether `at` lies within `window` before now. Future instants count as
    /// inside the window.
    fn is_within(&self, at: DateTime<Utc>, window: Duration) -> bool {
        self.now().signed_duration_since(at) <= window
    }
}

/// Wall clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
