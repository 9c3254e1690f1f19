use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// A log record as persisted by the storage layer. Timestamps are kept as the
/// raw strings the client submitted; they are only parsed when entries are
/// normalized for statistics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    pub id: u64,
    pub user_id: String,
    #[serde(default)]
    pub occurred_at: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AppData {
    pub next_id: u64,
    pub logs: Vec<LogRecord>,
}

/// A validated entry, ready for aggregation.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: u64,
    pub occurred_at: DateTime<FixedOffset>,
    pub status: String,
    pub category_name: String,
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogStatus {
    Done,
    InProgress,
    Pending,
    Unknown,
}

impl LogStatus {
    pub fn classify(raw: &str) -> Self {
        let normalized = raw.trim().to_lowercase();
        match normalized.as_str() {
            "selesai" => Self::Done,
            "proses" => Self::InProgress,
            "pending" => Self::Pending,
            _ => Self::Unknown,
        }
    }
}

/// One civil day in the canonical time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayToken(NaiveDate);

impl DayToken {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn date(self) -> NaiveDate {
        self.0
    }

    pub fn previous(self) -> Option<Self> {
        self.0.pred_opt().map(Self)
    }

    /// Whole calendar days from `other` up to `self`.
    pub fn days_since(self, other: DayToken) -> i64 {
        (self.0 - other.0).num_days()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub done: u64,
    pub in_progress: u64,
    pub pending: u64,
}

#[derive(Debug, Clone, Serialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub current_streak: u32,
    pub total_logs_this_month: u64,
    pub recent_activity: Vec<LogEntry>,
    pub status_counts: StatusCounts,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLogRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub occurred_at: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLogRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub occurred_at: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct DashboardQuery {
    pub tz: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct LogsQuery {
    pub date: Option<String>,
}
