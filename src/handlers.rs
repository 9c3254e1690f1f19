use crate::config::parse_timezone;
use crate::errors::AppError;
use crate::models::{
    CreateLogRequest, DashboardQuery, DashboardSnapshot, LogRecord, LogsQuery, UpdateLogRequest,
};
use crate::normalize::{parse_timestamp, to_day_token};
use crate::repository::FETCH_LIMIT;
use crate::state::AppState;
use crate::stats::dashboard_for;
use crate::storage::persist_data;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::{NaiveDate, SecondsFormat, Utc};
use chrono_tz::Tz;
use tracing::info;

const USER_HEADER: &str = "x-user-id";
const DEFAULT_STATUS: &str = "Selesai";

pub async fn get_dashboard(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardSnapshot>, AppError> {
    let user_id = user_id(&headers)?;
    let tz = match query.tz.as_deref() {
        Some(name) => parse_timezone(name)?,
        None => state.timezone,
    };

    let data = state.data.lock().await;
    Ok(Json(dashboard_for(&*data, &user_id, tz, Utc::now())))
}

pub async fn list_logs(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<LogsQuery>,
) -> Result<Json<Vec<LogRecord>>, AppError> {
    let user_id = user_id(&headers)?;
    let data = state.data.lock().await;

    let logs = match query.date.as_deref() {
        Some(raw) => {
            let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .map_err(|_| AppError::bad_request("date must be YYYY-MM-DD"))?;
            data.logs_for(&user_id)
                .filter(|record| occurs_on(record, date, state.timezone))
                .cloned()
                .collect()
        }
        None => data.logs_for(&user_id).take(FETCH_LIMIT).cloned().collect(),
    };

    Ok(Json(logs))
}

pub async fn create_log(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateLogRequest>,
) -> Result<(StatusCode, Json<LogRecord>), AppError> {
    let user_id = user_id(&headers)?;
    let title = payload.title.trim();
    if title.is_empty() {
        return Err(AppError::bad_request("title must not be empty"));
    }
    let occurred_at = canonical_timestamp(&payload.occurred_at, state.timezone)?;

    let record = LogRecord {
        id: 0,
        user_id,
        occurred_at: Some(occurred_at),
        status: status_or_default(payload.status),
        category: non_blank(payload.category),
        title: Some(title.to_string()),
        description: non_blank(payload.description),
        created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, false),
    };

    let mut data = state.data.lock().await;
    let stored = data.insert(record);
    persist_data(&state.data_path, &data).await?;
    info!(id = stored.id, user_id = %stored.user_id, "created log entry");

    Ok((StatusCode::CREATED, Json(stored)))
}

pub async fn update_log(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(payload): Json<UpdateLogRequest>,
) -> Result<Json<LogRecord>, AppError> {
    let user_id = user_id(&headers)?;
    let occurred_at = payload
        .occurred_at
        .as_deref()
        .map(|raw| canonical_timestamp(raw, state.timezone))
        .transpose()?;
    if let Some(title) = payload.title.as_deref() {
        if title.trim().is_empty() {
            return Err(AppError::bad_request("title must not be empty"));
        }
    }

    let mut data = state.data.lock().await;
    let updated = {
        let record = data
            .find_mut(&user_id, id)
            .ok_or_else(|| AppError::not_found(format!("log {id} not found")))?;
        if let Some(title) = payload.title {
            record.title = Some(title.trim().to_string());
        }
        if let Some(description) = payload.description {
            record.description = non_blank(Some(description));
        }
        if let Some(occurred_at) = occurred_at {
            record.occurred_at = Some(occurred_at);
        }
        if let Some(category) = payload.category {
            record.category = non_blank(Some(category));
        }
        if payload.status.is_some() {
            record.status = status_or_default(payload.status);
        }
        record.clone()
    };

    persist_data(&state.data_path, &data).await?;
    Ok(Json(updated))
}

pub async fn delete_log(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Result<StatusCode, AppError> {
    let user_id = user_id(&headers)?;
    let mut data = state.data.lock().await;
    data.remove(&user_id, id)
        .ok_or_else(|| AppError::not_found(format!("log {id} not found")))?;
    persist_data(&state.data_path, &data).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn user_id(headers: &HeaderMap) -> Result<String, AppError> {
    headers
        .get(USER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::bad_request("missing x-user-id header"))
}

/// Stores timestamps as RFC 3339 so storage ordering never depends on the zone.
fn canonical_timestamp(raw: &str, tz: Tz) -> Result<String, AppError> {
    let parsed = parse_timestamp(raw, tz)?;
    Ok(parsed.to_rfc3339_opts(SecondsFormat::AutoSi, false))
}

fn occurs_on(record: &LogRecord, date: NaiveDate, tz: Tz) -> bool {
    record
        .occurred_at
        .as_deref()
        .and_then(|raw| parse_timestamp(raw, tz).ok())
        .is_some_and(|timestamp| to_day_token(&timestamp, tz).date() == date)
}

/// Blank or absent statuses fall back to the "done" literal.
fn status_or_default(status: Option<String>) -> String {
    non_blank(status).unwrap_or_else(|| DEFAULT_STATUS.to_string())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
