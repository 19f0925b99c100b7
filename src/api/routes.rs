//! HTTP API route definitions.

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use super::cors::cors_layer;
use super::handlers::{
    get_contribution, get_ytd, health, metrics, save_contribution, save_ytd, AppState,
};
use crate::config::Config;

/// Create the API router.
pub fn create_router(state: AppState, config: &Config) -> Router {
    Router::new()
        // Document endpoints
        .route("/api/contribution", get(get_contribution).post(save_contribution))
        .route("/api/ytd", get(get_ytd).post(save_ytd))
        // Health and metrics
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .with_state(state)
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
}
