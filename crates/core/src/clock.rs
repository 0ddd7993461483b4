//! Clock seam.
//!
//! Domain code never reads the wall clock directly: callers pass `today`/`now`
//! in, and services obtain them from a [`Clock`].

use std::sync::Mutex;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

use crate::error::{DomainError, DomainResult};

/// Longest trailing window, in days, a caller may ask for.
pub const MAX_WINDOW_DAYS: i64 = 3650;

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar day (UTC).
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Midnight UTC at the start of `day`.
pub fn start_of_day(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

/// Start of the trailing window of `days` days ending at `now`.
///
/// `days` must lie in `1..=MAX_WINDOW_DAYS`.
pub fn window_start(now: DateTime<Utc>, days: i64) -> DomainResult<DateTime<Utc>> {
    if !(1..=MAX_WINDOW_DAYS).contains(&days) {
        return Err(DomainError::validation(format!(
            "days must be between 1 and {MAX_WINDOW_DAYS}"
        )));
    }
    Duration::try_days(days)
        .and_then(|window| now.checked_sub_signed(window))
        .ok_or_else(|| DomainError::validation("days is out of range"))
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for tests and simulations.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        match self.now.lock() {
            Ok(mut guard) => *guard = now,
            Err(poisoned) => *poisoned.into_inner() = now,
        }
    }

    pub fn advance(&self, by: Duration) {
        let next = self.now() + by;
        self.set(next);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        match self.now.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn fixed_clock_advances_across_midnight() {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 23, 30, 0).unwrap());
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());

        clock.advance(Duration::hours(1));
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
    }

    #[test]
    fn window_start_rejects_out_of_range_days() {
        let now = Utc.with_ymd_and_hms(2024, 3, 8, 12, 0, 0).unwrap();
        assert_eq!(
            window_start(now, 7).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
        );
        assert!(window_start(now, MAX_WINDOW_DAYS).is_ok());

        for days in [0, -1, MAX_WINDOW_DAYS + 1, 10_000_000_000, i64::MAX, i64::MIN] {
            assert!(
                matches!(window_start(now, days), Err(DomainError::Validation(_))),
                "days = {days}"
            );
        }
    }
}
