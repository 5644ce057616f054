use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::db::AppState;
use crate::error::Result;
use crate::extractors::Json;
use crate::licensing;
use crate::models::IssueLicense;

#[derive(Debug, Deserialize)]
pub struct CreateKeyRequest {
    #[serde(alias = "owner")]
    pub username: String,
    /// Omitted for a key that never expires
    #[serde(default)]
    pub days: Option<i64>,
    #[serde(default)]
    pub hwid_locked: bool,
    #[serde(default)]
    pub features: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateKeyResponse {
    pub success: bool,
    pub key: String,
}

/// Body shared by every single-key admin action.
#[derive(Debug, Deserialize)]
pub struct KeyRequest {
    pub key: String,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    fn ok() -> Json<Self> {
        Json(Self { success: true })
    }
}

/// POST /api/webhook/create
pub async fn create_key(
    State(state): State<AppState>,
    Json(req): Json<CreateKeyRequest>,
) -> Result<Json<CreateKeyResponse>> {
    let conn = state.db.get()?;

    let license = licensing::issue(
        &conn,
        &IssueLicense {
            owner: req.username,
            duration_days: req.days,
            hwid_locked: req.hwid_locked,
            features: req.features,
        },
    )?;

    Ok(Json(CreateKeyResponse {
        success: true,
        key: license.key,
    }))
}

/// POST /api/webhook/delete
pub async fn delete_key(
    State(state): State<AppState>,
    Json(req): Json<KeyRequest>,
) -> Result<Json<SuccessResponse>> {
    let conn = state.db.get()?;
    licensing::revoke(&conn, &req.key)?;
    Ok(SuccessResponse::ok())
}

/// POST /api/webhook/ban
pub async fn ban_key(
    State(state): State<AppState>,
    Json(req): Json<KeyRequest>,
) -> Result<Json<SuccessResponse>> {
    let conn = state.db.get()?;
    licensing::ban(&conn, &req.key)?;
    Ok(SuccessResponse::ok())
}

/// POST /api/webhook/expire
pub async fn expire_key(
    State(state): State<AppState>,
    Json(req): Json<KeyRequest>,
) -> Result<Json<SuccessResponse>> {
    let conn = state.db.get()?;
    licensing::expire(&conn, &req.key)?;
    Ok(SuccessResponse::ok())
}

/// POST /api/webhook/reset-hwid
pub async fn reset_hwid(
    State(state): State<AppState>,
    Json(req): Json<KeyRequest>,
) -> Result<Json<SuccessResponse>> {
    let conn = state.db.get()?;
    licensing::reset_hwid(&conn, &req.key)?;
    Ok(SuccessResponse::ok())
}
