mod init;
mod validate;

pub use init::*;
pub use validate::*;

use axum::{
    Json, Router,
    routing::{get, post},
};
use serde::Serialize;

use crate::config::RateLimitConfig;
use crate::db::AppState;
use crate::rate_limit;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub fn router(rate_limit: RateLimitConfig) -> Router<AppState> {
    let mut auth_routes = Router::new()
        .route("/api/auth", post(authenticate))
        .route("/api/init", post(initialize));
    if let Some(layer) = rate_limit::standard_layer(rate_limit.standard_rpm) {
        auth_routes = auth_routes.layer(layer);
    }

    let mut health_routes = Router::new().route("/health", get(health));
    if let Some(layer) = rate_limit::relaxed_layer(rate_limit.relaxed_rpm) {
        health_routes = health_routes.layer(layer);
    }

    auth_routes.merge(health_routes)
}
