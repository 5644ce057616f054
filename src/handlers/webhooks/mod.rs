pub mod lifecycle;

pub use lifecycle::*;

use axum::{Router, routing::post};

use crate::db::AppState;

/// Administrative key lifecycle. Not rate limited.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/webhook/create", post(create_key))
        .route("/api/webhook/delete", post(delete_key))
        .route("/api/webhook/ban", post(ban_key))
        .route("/api/webhook/expire", post(expire_key))
        .route("/api/webhook/reset-hwid", post(reset_hwid))
}
