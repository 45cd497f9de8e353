//! `--since` parsing
//!
//! Accepts RFC 3339 timestamps, plain `YYYY-MM-DD` dates (midnight UTC) and
//! past relative expressions such as `yesterday` or `3 days ago`.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::time::SystemTime;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateParseError {
    #[error(
        "invalid date '{0}': expected YYYY-MM-DD, RFC 3339, or a relative date such as '2 days ago'"
    )]
    Unrecognised(String),

    #[error("unknown time unit '{0}'")]
    UnknownUnit(String),

    #[error("invalid count '{0}' in relative date")]
    InvalidCount(String),

    #[error("relative date '{0}' is out of range")]
    OutOfRange(String),
}

/// Parse an incremental scan marker
pub fn parse_since(input: &str) -> Result<SystemTime, DateParseError> {
    let trimmed = input.trim();
    if let Some(time) = parse_absolute(trimmed) {
        return Ok(time);
    }
    parse_relative(trimmed, Utc::now())
}

fn parse_absolute(input: &str) -> Option<SystemTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc).into());
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().into())
}

fn parse_relative(input: &str, now: DateTime<Utc>) -> Result<SystemTime, DateParseError> {
    let lower = input.to_lowercase();
    match lower.as_str() {
        "now" | "today" => return Ok(now.into()),
        "yesterday" => return Ok((now - Duration::days(1)).into()),
        _ => {}
    }

    let parts: Vec<&str> = lower.split_whitespace().collect();
    match parts.as_slice() {
        [count, unit, "ago"] => {
            let count = count
                .parse::<i64>()
                .map_err(|_| DateParseError::InvalidCount(count.to_string()))?;
            unit_duration(unit, count)?
                .and_then(|delta| now.checked_sub_signed(delta))
                .map(SystemTime::from)
                .ok_or_else(|| DateParseError::OutOfRange(input.to_string()))
        }
        _ => Err(DateParseError::Unrecognised(input.to_string())),
    }
}

fn unit_duration(unit: &str, count: i64) -> Result<Option<Duration>, DateParseError> {
    let delta = match unit {
        "second" | "seconds" | "sec" | "secs" | "s" => Duration::try_seconds(count),
        "minute" | "minutes" | "min" | "mins" | "m" => Duration::try_minutes(count),
        "hour" | "hours" | "hr" | "hrs" | "h" => Duration::try_hours(count),
        "day" | "days" | "d" => Duration::try_days(count),
        "week" | "weeks" | "w" => Duration::try_weeks(count),
        // months and years are approximate
        "month" | "months" => count.checked_mul(30).and_then(Duration::try_days),
        "year" | "years" | "y" => count.checked_mul(365).and_then(Duration::try_days),
        _ => return Err(DateParseError::UnknownUnit(unit.to_string())),
    };
    Ok(delta)
}
