pub mod dashboard;
pub mod public;
pub mod webhooks;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::RateLimitConfig;
use crate::db::AppState;

/// Full application router with state attached.
pub fn app(state: AppState, rate_limit: RateLimitConfig) -> Router {
    Router::new()
        // Client-facing (rate limited)
        .merge(public::router(rate_limit))
        // Key lifecycle
        .merge(webhooks::router())
        // Dashboard
        .merge(dashboard::router())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
