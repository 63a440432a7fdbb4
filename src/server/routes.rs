//! Router configuration for the web server.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use super::handlers;
use super::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    // Leave headroom above the file cap for the multipart envelope; the
    // upload handler enforces the exact per-file limit.
    let body_limit = state.max_upload_bytes.saturating_add(64 * 1024);

    Router::new()
        // Embedded browser client
        .route("/", get(handlers::serve_index))
        .route("/static/style.css", get(handlers::serve_css))
        .route("/static/app.js", get(handlers::serve_js))
        // Upload and conversion pipeline
        .route("/upload/file", post(handlers::upload_file))
        .route("/convert", get(handlers::convert_latest))
        .route("/convert/:upload_id", get(handlers::convert_upload))
        // Upload metadata and stored file serving
        .route("/api/uploads", get(handlers::api_uploads))
        .route("/api/uploads/:upload_id", get(handlers::api_upload))
        .route("/uploads/:upload_id/file", get(handlers::serve_upload_file))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
