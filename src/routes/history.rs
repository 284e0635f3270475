//! History endpoints: bounded newest-first listing and bulk clear.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::instrument;

use crate::calc::Operation;
use crate::error::ApiError;
use crate::history::CalculationRecord;
use crate::state::AppState;

/// One history entry as returned by GET /api/history.
///
/// `expression` is derived from the stored fields on every read; it is not
/// persisted.
#[derive(Debug, Serialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub num1: f64,
    pub num2: f64,
    pub operation: Operation,
    pub result: f64,
    pub timestamp: DateTime<Utc>,
    pub expression: String,
}

impl From<CalculationRecord> for HistoryEntry {
    fn from(record: CalculationRecord) -> Self {
        Self {
            expression: record.expression(),
            id: record.id,
            num1: record.num1,
            num2: record.num2,
            operation: record.operation,
            result: record.result,
            timestamp: record.created_at,
        }
    }
}

/// Handler for GET /api/history.
///
/// Returns up to the configured window of records, most recent first.
#[instrument(name = "history::list", skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<HistoryEntry>>, ApiError> {
    let records = state.history.recent(state.config.history.window).await?;
    Ok(Json(records.into_iter().map(HistoryEntry::from).collect()))
}

/// Response body for DELETE /api/history.
#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub message: &'static str,
}

/// Handler for DELETE /api/history. Irreversible.
#[instrument(name = "history::clear", skip(state))]
pub async fn clear(State(state): State<AppState>) -> Result<Json<ClearResponse>, ApiError> {
    let removed = state.history.clear().await?;
    tracing::info!(removed, "History cleared");

    Ok(Json(ClearResponse {
        message: "History cleared successfully",
    }))
}
