//! Router construction

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::api::handlers;
use crate::AppState;

/// Build the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let server = &state.settings.server;
    let body_limit = server.body_limit_bytes;
    let timeout = Duration::from_secs(server.request_timeout_secs);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/generate-image", post(handlers::generate_image))
        .route("/api/analyze-image", post(handlers::generate_image))
        .route("/api/inpaint", post(handlers::inpaint))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TimeoutLayer::new(timeout))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
