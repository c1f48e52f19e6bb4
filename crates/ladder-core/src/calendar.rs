//! Calendar day normalization.
//!
//! The engine only ever compares `NaiveDate`s. Callers decide which timezone
//! a check-in belongs to and normalize instants here before building a
//! snapshot.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, Utc};

use crate::error::{LadderError, Result};

/// Calendar day of `instant` as seen from a fixed UTC offset.
pub fn day_in_offset(instant: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    instant.with_timezone(&offset).date_naive()
}

/// Calendar day of `instant` in UTC.
pub fn utc_day(instant: DateTime<Utc>) -> NaiveDate {
    instant.date_naive()
}

/// Today in the machine's local timezone.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse a `YYYY-MM-DD` day.
pub fn parse_day(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| LadderError::invalid(format!("bad date '{}': {}", s, e)))
}

/// Whole calendar days from `earlier` to `later` (negative if reversed).
pub fn days_between(earlier: NaiveDate, later: NaiveDate) -> i64 {
    (later - earlier).num_days()
}
