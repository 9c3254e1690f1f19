use crate::models::{AppData, LogRecord};
use crate::normalize::parse_timestamp;
use chrono_tz::Tz;
use std::cmp::Reverse;
use thiserror::Error;

/// Row cap applied by storage backends when fetching a user's whole history.
pub const FETCH_LIMIT: usize = 1000;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("log storage unavailable: {0}")]
    Unavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Storage-agnostic source of one user's log records. Backends implement
/// fetching only; statistics are computed by [`crate::stats`].
pub trait LogRepository {
    fn fetch(&self, user_id: &str) -> Result<Vec<LogRecord>, RepositoryError>;
}

impl LogRepository for AppData {
    /// Newest first by `occurredAt`, creation order among equal or
    /// unparseable timestamps, capped at [`FETCH_LIMIT`]. Timestamps without
    /// an offset are ordered as UTC.
    fn fetch(&self, user_id: &str) -> Result<Vec<LogRecord>, RepositoryError> {
        let mut records: Vec<LogRecord> = self
            .logs
            .iter()
            .filter(|record| record.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by_key(|record| {
            Reverse(
                record
                    .occurred_at
                    .as_deref()
                    .and_then(|raw| parse_timestamp(raw, Tz::UTC).ok()),
            )
        });
        records.truncate(FETCH_LIMIT);
        Ok(records)
    }
}

impl AppData {
    /// The user's records in creation order.
    pub fn logs_for(&self, user_id: &str) -> impl Iterator<Item = &LogRecord> {
        self.logs.iter().filter(move |record| record.user_id == user_id)
    }

    pub fn find_mut(&mut self, user_id: &str, id: u64) -> Option<&mut LogRecord> {
        self.logs
            .iter_mut()
            .find(|record| record.id == id && record.user_id == user_id)
    }

    pub fn remove(&mut self, user_id: &str, id: u64) -> Option<LogRecord> {
        let index = self
            .logs
            .iter()
            .position(|record| record.id == id && record.user_id == user_id)?;
        Some(self.logs.remove(index))
    }

    pub fn insert(&mut self, mut record: LogRecord) -> LogRecord {
        self.next_id = self.next_id.saturating_add(1).max(self.max_id() + 1);
        record.id = self.next_id;
        self.logs.push(record.clone());
        record
    }

    fn max_id(&self) -> u64 {
        self.logs.iter().map(|record| record.id).max().unwrap_or(0)
    }
}
