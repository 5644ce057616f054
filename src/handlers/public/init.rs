use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::db::AppState;
use crate::error::Result;
use crate::extractors::{ClientIp, Json};
use crate::licensing;

#[derive(Debug, Deserialize)]
pub struct InitRequest {
    pub key: String,
    #[serde(default)]
    pub hwid: String,
}

#[derive(Debug, Serialize)]
pub struct InitResponse {
    pub success: bool,
    pub message: String,
}

/// POST /api/init
/// Claims an unbound key for the caller's HWID. Fails once a HWID is bound.
pub async fn initialize(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    Json(req): Json<InitRequest>,
) -> Result<Json<InitResponse>> {
    let conn = state.db.get()?;

    licensing::initialize(&conn, &req.key, &req.hwid, &ip)?;

    Ok(Json(InitResponse {
        success: true,
        message: "HWID registered".to_string(),
    }))
}
