use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::db::AppState;
use crate::error::Result;
use crate::extractors::{ClientIp, Json};
use crate::licensing;
use crate::models::AuthSuccess;

#[derive(Debug, Deserialize)]
pub struct AuthRequest {
    /// Missing keys still count as an attempt and are logged as failures
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub hwid: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    pub data: AuthSuccess,
}

/// POST /api/auth
pub async fn authenticate(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    Json(req): Json<AuthRequest>,
) -> Result<Json<AuthResponse>> {
    let mut conn = state.db.get()?;

    let data = licensing::validate(&mut conn, &req.key, &req.hwid, &ip)?;

    Ok(Json(AuthResponse {
        success: true,
        message: "Authenticated".to_string(),
        data,
    }))
}
