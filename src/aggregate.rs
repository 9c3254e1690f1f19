use crate::models::{DayToken, LogEntry, LogStatus, StatusCounts};
use crate::normalize::{to_day_token, today_token};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;

pub const RECENT_ACTIVITY_LIMIT: usize = 5;

/// Entries whose day falls in the calendar month containing `now`.
pub fn monthly_count(entries: &[LogEntry], now: DateTime<Utc>, tz: Tz) -> u64 {
    let today = today_token(now, tz);
    let Some((start, end)) = month_bounds(today.date()) else {
        return 0;
    };

    entries
        .iter()
        .map(|entry| to_day_token(&entry.occurred_at, tz))
        .filter(|day| *day >= start && *day < end)
        .count() as u64
}

pub fn status_counts(entries: &[LogEntry]) -> StatusCounts {
    entries
        .iter()
        .fold(StatusCounts::default(), |mut counts, entry| {
            match LogStatus::classify(&entry.status) {
                LogStatus::Done => counts.done = counts.done.saturating_add(1),
                LogStatus::InProgress => counts.in_progress = counts.in_progress.saturating_add(1),
                LogStatus::Pending => counts.pending = counts.pending.saturating_add(1),
                LogStatus::Unknown => {}
            }
            counts
        })
}

/// Newest entries first. Entries with the same instant keep their input
/// order, so the result only depends on the input sequence.
pub fn recent_activity(entries: &[LogEntry], limit: usize) -> Vec<LogEntry> {
    let mut sorted: Vec<&LogEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
    sorted.into_iter().take(limit).cloned().collect()
}

fn month_bounds(date: NaiveDate) -> Option<(DayToken, DayToken)> {
    let start = NaiveDate::from_ymd_opt(date.year(), date.month(), 1)?;
    let end = if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)?
    };
    Some((DayToken::new(start), DayToken::new(end)))
}
