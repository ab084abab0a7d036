// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Calendar date and timestamp helpers.
//!
//! Dates travel as `YYYY-MM-DD`. Timestamps are kept at millisecond
//! precision so they survive a round trip through storage unchanged.

use crate::error::DomainError;
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime, PrimitiveDateTime};

/// Parses a `YYYY-MM-DD` calendar date.
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if the string is not a valid date.
pub fn parse_date(value: &str) -> Result<Date, DomainError> {
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(value, &format).map_err(|e| DomainError::DateParseError {
        date_string: value.to_string(),
        error: e.to_string(),
    })
}

/// Formats a calendar date as `YYYY-MM-DD`.
#[must_use]
pub fn format_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// Truncates a timestamp to whole milliseconds.
#[must_use]
pub fn truncate_to_millis(at: OffsetDateTime) -> OffsetDateTime {
    at - Duration::nanoseconds(i64::from(at.nanosecond() % 1_000_000))
}

/// The current UTC time at millisecond precision.
#[must_use]
pub fn now_millis() -> OffsetDateTime {
    truncate_to_millis(OffsetDateTime::now_utc())
}

/// Converts a timestamp to Unix milliseconds.
#[must_use]
pub fn to_unix_millis(at: OffsetDateTime) -> i64 {
    // Sub-millisecond precision is discarded.
    i64::try_from(at.unix_timestamp_nanos() / 1_000_000).unwrap_or(i64::MAX)
}

/// Converts Unix milliseconds back to a UTC timestamp.
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if the value is out of range.
pub fn from_unix_millis(millis: i64) -> Result<OffsetDateTime, DomainError> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000).map_err(|e| {
        DomainError::DateParseError {
            date_string: millis.to_string(),
            error: e.to_string(),
        }
    })
}

/// Returns `now` minus a whole number of days.
///
/// Saturates at the earliest representable timestamp, so a huge threshold
/// selects nothing instead of overflowing.
#[must_use]
pub fn cutoff(now: OffsetDateTime, days: u32) -> OffsetDateTime {
    now.checked_sub(Duration::days(i64::from(days)))
        .unwrap_or_else(|| PrimitiveDateTime::MIN.assume_utc())
}
