use crate::aggregate::{monthly_count, recent_activity, status_counts, RECENT_ACTIVITY_LIMIT};
use crate::models::{DashboardSnapshot, LogEntry, LogRecord};
use crate::normalize::{to_day_token, to_entry, today_token};
use crate::repository::LogRepository;
use crate::streak::current_streak;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::{error, warn};

/// Fetches one user's records and summarises them. A failing repository
/// degrades to the zeroed snapshot instead of surfacing an error.
pub fn dashboard_for<R: LogRepository + ?Sized>(
    repository: &R,
    user_id: &str,
    tz: Tz,
    now: DateTime<Utc>,
) -> DashboardSnapshot {
    match repository.fetch(user_id) {
        Ok(records) => build_snapshot(&records, tz, now),
        Err(err) => {
            error!(user_id, "failed to fetch logs for dashboard: {err}");
            DashboardSnapshot::default()
        }
    }
}

pub fn build_snapshot(records: &[LogRecord], tz: Tz, now: DateTime<Utc>) -> DashboardSnapshot {
    let entries = valid_entries(records, tz);
    build_snapshot_from_entries(&entries, tz, now)
}

pub fn build_snapshot_from_entries(
    entries: &[LogEntry],
    tz: Tz,
    now: DateTime<Utc>,
) -> DashboardSnapshot {
    let days = entries
        .iter()
        .map(|entry| to_day_token(&entry.occurred_at, tz));

    DashboardSnapshot {
        current_streak: current_streak(days, today_token(now, tz)),
        total_logs_this_month: monthly_count(entries, now, tz),
        recent_activity: recent_activity(entries, RECENT_ACTIVITY_LIMIT),
        status_counts: status_counts(entries),
    }
}

fn valid_entries(records: &[LogRecord], tz: Tz) -> Vec<LogEntry> {
    records
        .iter()
        .filter_map(|record| match to_entry(record, tz) {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!(id = record.id, "skipping malformed log entry: {err}");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppData, StatusCounts};
    use crate::repository::RepositoryError;

    struct UnreachableRepository;

    impl LogRepository for UnreachableRepository {
        fn fetch(&self, _user_id: &str) -> Result<Vec<LogRecord>, RepositoryError> {
            Err(RepositoryError::Unavailable("connection refused".to_string()))
        }
    }

    fn record(id: u64, occurred_at: &str, status: &str) -> LogRecord {
        LogRecord {
            id,
            user_id: "alice".to_string(),
            occurred_at: Some(occurred_at.to_string()),
            status: status.to_string(),
            category: Some("Work".to_string()),
            title: Some(format!("log {id}")),
            description: None,
            created_at: String::new(),
        }
    }

    fn at(raw: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(raw).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn empty_input_yields_zeroed_snapshot() {
        let snapshot = build_snapshot(&[], Tz::UTC, at("2026-01-12T09:00:00Z"));
        assert_eq!(snapshot, DashboardSnapshot::default());
    }

    #[test]
    fn same_day_entries_count_once_for_streak_but_twice_for_month() {
        let records = vec![
            record(1, "2026-01-12T08:00:00Z", "Selesai"),
            record(2, "2026-01-12T20:00:00Z", "Selesai"),
        ];
        let snapshot = build_snapshot(&records, Tz::UTC, at("2026-01-12T21:00:00Z"));
        assert_eq!(snapshot.current_streak, 1);
        assert_eq!(snapshot.total_logs_this_month, 2);
    }

    #[test]
    fn yesterday_anchor_just_after_midnight() {
        let records = vec![record(1, "2026-01-11T15:00:00Z", "Selesai")];
        let snapshot = build_snapshot(&records, Tz::UTC, at("2026-01-12T00:05:00Z"));
        assert_eq!(snapshot.current_streak, 1);
    }

    #[test]
    fn yesterday_is_the_previous_calendar_day_across_dst() {
        // 00:30 EDT on March 9th; 24 hours earlier is still March 7th EST.
        let tz = chrono_tz::America::New_York;
        let records = vec![record(1, "2026-03-08T12:00:00", "Selesai")];
        let snapshot = build_snapshot(&records, tz, at("2026-03-09T04:30:00Z"));
        assert_eq!(snapshot.current_streak, 1);
    }

    #[test]
    fn malformed_entries_are_skipped_not_fatal() {
        let mut broken = record(3, "not a date", "Selesai");
        broken.title = Some("broken".to_string());
        let mut untitled = record(4, "2026-01-12T10:00:00Z", "Proses");
        untitled.title = None;
        let records = vec![
            record(1, "2026-01-11T08:00:00Z", "Selesai"),
            record(2, "2026-01-12T08:00:00Z", "Pending"),
            broken,
            untitled,
        ];

        let snapshot = build_snapshot(&records, Tz::UTC, at("2026-01-12T09:00:00Z"));
        assert_eq!(snapshot.current_streak, 2);
        assert_eq!(snapshot.total_logs_this_month, 2);
        assert_eq!(snapshot.recent_activity.len(), 2);
        assert_eq!(
            snapshot.status_counts,
            StatusCounts { done: 1, in_progress: 0, pending: 1 }
        );
    }

    #[test]
    fn day_boundaries_follow_the_requested_zone() {
        // 17:30Z on the 11th is already the 12th in Jakarta (UTC+7).
        let records = vec![
            record(1, "2026-01-10T08:00:00Z", "Selesai"),
            record(2, "2026-01-11T17:30:00Z", "Selesai"),
        ];
        let now = at("2026-01-12T03:00:00Z");
        assert_eq!(build_snapshot(&records, Tz::UTC, now).current_streak, 2);
        assert_eq!(
            build_snapshot(&records, chrono_tz::Asia::Jakarta, now).current_streak,
            1
        );
    }

    #[test]
    fn recent_activity_bounded_and_sorted() {
        let records: Vec<LogRecord> = (1..=9)
            .map(|d| record(d, &format!("2026-01-{d:02}T08:00:00Z"), "Selesai"))
            .collect();
        let snapshot = build_snapshot(&records, Tz::UTC, at("2026-01-09T09:00:00Z"));
        assert_eq!(snapshot.recent_activity.len(), 5);
        assert!(
            snapshot
                .recent_activity
                .windows(2)
                .all(|pair| pair[0].occurred_at >= pair[1].occurred_at)
        );
        assert_eq!(snapshot.current_streak, 9);
    }

    #[test]
    fn repeated_computation_is_identical() {
        let records = vec![
            record(1, "2026-01-10T08:00:00Z", "Selesai"),
            record(2, "2026-01-11T08:00:00Z", "proses"),
            record(3, "2026-01-12T08:00:00Z", ""),
        ];
        let now = at("2026-01-12T09:00:00Z");
        let first = build_snapshot(&records, Tz::UTC, now);
        let second = build_snapshot(&records, Tz::UTC, now);
        assert_eq!(first, second);
        assert_eq!(first.current_streak, 3);
    }

    #[test]
    fn unreachable_repository_degrades_to_default() {
        let snapshot = dashboard_for(
            &UnreachableRepository,
            "alice",
            Tz::UTC,
            at("2026-01-12T09:00:00Z"),
        );
        assert_eq!(snapshot, DashboardSnapshot::default());
    }

    #[test]
    fn dashboard_reads_through_repository() {
        let mut data = AppData::default();
        data.insert(record(0, "2026-01-11T08:00:00Z", "Selesai"));
        data.insert(record(0, "2026-01-12T08:00:00Z", "Selesai"));
        let mut other = record(0, "2026-01-12T08:00:00Z", "Selesai");
        other.user_id = "bob".to_string();
        data.insert(other);

        let snapshot = dashboard_for(&data, "alice", Tz::UTC, at("2026-01-12T09:00:00Z"));
        assert_eq!(snapshot.current_streak, 2);
        assert_eq!(snapshot.total_logs_this_month, 2);
        assert_eq!(snapshot.status_counts.done, 2);
    }
}
