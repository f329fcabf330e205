//! Date helpers shared by the query builders and formatters.

use crate::config::DATE_FORMAT;
use crate::error::{Result, SanError};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Format a date the way every date cell is emitted (`YYYY-MM-DD`).
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Midnight UTC of `date`, as the API expects in `from`/`to` arguments.
pub fn to_graphql_datetime(date: NaiveDate) -> String {
    format!("{}T00:00:00Z", format_date(date))
}

/// Every calendar day in `[from, to)`, ascending.
pub fn each_day(from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
    from.iter_days().take_while(|day| *day < to).collect()
}

/// Parse a caller-supplied date.
///
/// Accepts a plain `YYYY-MM-DD` date or an RFC 3339 timestamp (the date part
/// in UTC is used).
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let input = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(input, DATE_FORMAT) {
        return Ok(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.naive_utc().date());
    }
    Err(SanError::InvalidArgument(format!(
        "'{}' is not a date (expected YYYY-MM-DD)",
        input
    )))
}

/// Canonicalize a date-like string returned by the API.
///
/// Returns `None` when the value cannot be read as a date.
pub fn canonical_date(raw: &str) -> Option<String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(format_date(dt.naive_utc().date()));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(format_date(dt.date()));
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .ok()
        .map(format_date)
}

/// The single-day range `[day, day + 1)`.
///
/// Fails on the last date chrono can represent.
pub fn day_range(day: NaiveDate) -> Result<(NaiveDate, NaiveDate)> {
    let next = day.succ_opt().ok_or_else(|| {
        SanError::InvalidArgument(format!("'{}' has no following day", format_date(day)))
    })?;
    Ok((day, next))
}
