//! Conversion of raw timestamps into calendar-day tokens.
//!
//! All time zone policy lives here: every day boundary used by the
//! statistics is computed in the single zone handed to these functions.

use crate::models::{DayToken, LogEntry, LogRecord};
use chrono::{DateTime, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use thiserror::Error;

const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug, Error, PartialEq)]
pub enum NormalizeError {
    #[error("unparseable timestamp: {0:?}")]
    Timestamp(String),

    #[error("local time {0} does not exist in the configured zone")]
    NonexistentLocalTime(String),

    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

/// Parses a timestamp. Values carrying an offset are taken as-is; naive
/// date-times and bare dates are civil time in `tz`.
pub fn parse_timestamp(raw: &str, tz: Tz) -> Result<DateTime<FixedOffset>, NormalizeError> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed);
    }

    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .or_else(|_| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map(|date| date.and_hms_opt(0, 0, 0).unwrap_or_default())
        })
        .map_err(|_| NormalizeError::Timestamp(raw.to_string()))?;

    match tz.from_local_datetime(&naive) {
        LocalResult::Single(local) => Ok(local.fixed_offset()),
        LocalResult::Ambiguous(earlier, _) => Ok(earlier.fixed_offset()),
        LocalResult::None => Err(NormalizeError::NonexistentLocalTime(raw.to_string())),
    }
}

pub fn to_day_token<Z: TimeZone>(timestamp: &DateTime<Z>, tz: Tz) -> DayToken {
    DayToken::new(timestamp.with_timezone(&tz).date_naive())
}

pub fn today_token(now: DateTime<Utc>, tz: Tz) -> DayToken {
    to_day_token(&now, tz)
}

/// Validates a stored record into an entry. Records without a title or a
/// parseable timestamp are rejected.
pub fn to_entry(record: &LogRecord, tz: Tz) -> Result<LogEntry, NormalizeError> {
    let raw_timestamp = record
        .occurred_at
        .as_deref()
        .filter(|value| !value.trim().is_empty())
        .ok_or(NormalizeError::MissingField("occurredAt"))?;
    let title = record
        .title
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(NormalizeError::MissingField("title"))?;

    let category_name = record
        .category
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(UNCATEGORIZED);

    Ok(LogEntry {
        id: record.id,
        occurred_at: parse_timestamp(raw_timestamp, tz)?,
        status: record.status.clone(),
        category_name: category_name.to_string(),
        title: title.to_string(),
    })
}
