//! Calendar resolution
//!
//! Produces the canonical "today" for a run. The date is captured once at the
//! start of a run as a [`RunDate`] and threaded through every component, so a
//! run that crosses midnight still observes a single day.

use chrono::{Datelike, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;
use std::fmt;

/// Format of the canonical date string, e.g. `October 18, 2026`
pub const CANONICAL_FORMAT: &str = "%B %-d, %Y";

/// The day a run is working on.
///
/// `canonical` is the identity key used by the run guard and stored in every
/// history entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunDate {
    date: NaiveDate,
    canonical: String,
}

impl RunDate {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            canonical: date.format(CANONICAL_FORMAT).to_string(),
        }
    }

    /// Canonical display/identity string
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// ISO-8601 form (`2026-10-18`), as used by the holiday lookup
    pub fn iso(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn month(&self) -> u32 {
        self.date.month()
    }

    pub fn day(&self) -> u32 {
        self.date.day()
    }

    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }
}

impl fmt::Display for RunDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

/// Source of "today"
pub trait Clock: Send + Sync {
    fn today(&self) -> RunDate;
}

/// Wall clock read in a fixed timezone
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    tz: Tz,
}

impl SystemClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }
}

impl Clock for SystemClock {
    fn today(&self) -> RunDate {
        RunDate::new(Utc::now().with_timezone(&self.tz).date_naive())
    }
}

/// Clock pinned to one date
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> RunDate {
        RunDate::new(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_canonical_format() {
        assert_eq!(RunDate::new(date(2026, 10, 18)).canonical(), "October 18, 2026");
        assert_eq!(RunDate::new(date(2026, 3, 4)).canonical(), "March 4, 2026");
    }

    #[test]
    fn test_iso_format() {
        assert_eq!(RunDate::new(date(2026, 3, 4)).iso(), "2026-03-04");
    }

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock(date(2026, 7, 4));
        let today = clock.today();
        assert_eq!(today.weekday(), Weekday::Sat);
        assert_eq!((today.month(), today.day()), (7, 4));
    }

    #[test]
    fn test_timezone_shifts_day() {
        // 05:30 UTC on Oct 19 is still Oct 18 in Los Angeles
        let instant = Utc.with_ymd_and_hms(2026, 10, 19, 5, 30, 0).unwrap();
        let local = instant.with_timezone(&chrono_tz::America::Los_Angeles);
        assert_eq!(RunDate::new(local.date_naive()).canonical(), "October 18, 2026");
    }
}
