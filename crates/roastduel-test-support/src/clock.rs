//! A `Clock` pinned to one instant.

use chrono::{DateTime, TimeZone, Utc};
use roastduel_core::clock::Clock;

/// A clock that always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Noon UTC on the given day.
    ///
    /// # Panics
    ///
    /// Panics if the date does not exist.
    #[must_use]
    pub fn noon(year: i32, month: u32, day: u32) -> Self {
        Self(Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
