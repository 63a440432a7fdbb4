//! Embedded client asset handlers.

use axum::http::header;
use axum::response::IntoResponse;

use super::super::assets;

/// Serve the browser client page.
pub async fn serve_index() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/html; charset=utf-8")], assets::INDEX)
}

/// Serve CSS.
pub async fn serve_css() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css")], assets::CSS)
}

/// Serve JavaScript.
pub async fn serve_js() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/javascript")], assets::JS)
}
