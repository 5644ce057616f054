//! Read-only reporting endpoints.

use axum::{Router, extract::State, routing::get};
use serde::{Deserialize, Serialize};

use crate::db::AppState;
use crate::error::Result;
use crate::extractors::{Json, Query};
use crate::models::{KeyView, LogEntry, Stats};
use crate::pagination::PaginationQuery;
use crate::reporting;

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub success: bool,
    pub stats: Stats,
}

#[derive(Debug, Serialize)]
pub struct KeysResponse {
    pub success: bool,
    pub keys: Vec<KeyView>,
}

#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    pub key: String,
    #[serde(default)]
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct LogsResponse {
    pub success: bool,
    pub logs: Vec<LogEntry>,
}

pub async fn stats(State(state): State<AppState>) -> Result<Json<StatsResponse>> {
    let conn = state.db.get()?;
    let stats = reporting::get_stats(&conn)?;
    Ok(Json(StatsResponse {
        success: true,
        stats,
    }))
}

pub async fn keys(
    State(state): State<AppState>,
    Query(page): Query<PaginationQuery>,
) -> Result<Json<KeysResponse>> {
    let conn = state.db.get()?;
    let keys = reporting::list_keys(&conn, page.limit)?;
    Ok(Json(KeysResponse {
        success: true,
        keys,
    }))
}

pub async fn logs(
    State(state): State<AppState>,
    Query(query): Query<LogsQuery>,
) -> Result<Json<LogsResponse>> {
    let conn = state.db.get()?;
    let logs = reporting::list_logs(&conn, &query.key, query.limit)?;
    Ok(Json(LogsResponse {
        success: true,
        logs,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/stats", get(stats))
        .route("/api/keys", get(keys))
        .route("/api/logs", get(logs))
}
