//! Conversion between the remote service's integer date/time encoding
//! (`20220420`, `1230`) and the canonical `yyyy-mm-dd` / `hh:mm` strings
//! that [`Period`](crate::Period) construction accepts.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate, NaiveTime};
use regex::Regex;

use crate::error::{Result, TimetableError};

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());
static TIME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{2}:\d{2}$").unwrap());

/// Render a `yyyymmdd` integer as `yyyy-mm-dd`. No calendar validation happens here.
pub fn untis_date(value: u32) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        value / 10_000,
        (value / 100) % 100,
        value % 100
    )
}

/// Render an `hmm`/`hhmm` integer as `hh:mm`.
pub fn untis_time(value: u32) -> String {
    format!("{:02}:{:02}", value / 100, value % 100)
}

/// Encode a calendar date as the remote `yyyymmdd` integer.
pub fn to_untis_date(date: NaiveDate) -> u32 {
    // Years before 0 never reach the remote service.
    date.year().max(0) as u32 * 10_000 + date.month() * 100 + date.day()
}

/// Parse a canonical `yyyy-mm-dd` date.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    if !DATE_RE.is_match(value) {
        return Err(TimetableError::InvalidDate(value.to_string()));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| TimetableError::InvalidDate(value.to_string()))
}

/// Parse a canonical `hh:mm` time of day.
pub fn parse_time(value: &str) -> Result<NaiveTime> {
    if !TIME_RE.is_match(value) {
        return Err(TimetableError::InvalidTime(value.to_string()));
    }
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| TimetableError::InvalidTime(value.to_string()))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}
