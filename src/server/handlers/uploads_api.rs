//! Upload metadata API and stored file serving.

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use uuid::Uuid;

use crate::uploads::UploadRecord;

use super::super::error::{ApiError, Result};
use super::super::AppState;

fn lookup_id(raw: &str) -> Result<Uuid> {
    raw.parse::<Uuid>().map_err(|_| ApiError::UploadNotFound {
        id: raw.to_string(),
    })
}

/// List all uploads, newest first.
pub async fn api_uploads(State(state): State<AppState>) -> Json<Vec<UploadRecord>> {
    let records = state.uploads.list().await;
    Json(records.iter().map(|r| (**r).clone()).collect())
}

/// Fetch one upload record.
pub async fn api_upload(
    State(state): State<AppState>,
    Path(upload_id): Path<String>,
) -> Result<Json<UploadRecord>> {
    let id = lookup_id(&upload_id)?;
    let record = state
        .uploads
        .get(id)
        .await
        .ok_or(ApiError::UploadNotFound { id: upload_id })?;
    Ok(Json((*record).clone()))
}

/// Serve the stored bytes of an upload (used by the client for previews).
pub async fn serve_upload_file(
    State(state): State<AppState>,
    Path(upload_id): Path<String>,
) -> Result<Response> {
    let id = lookup_id(&upload_id)?;
    let record = state
        .uploads
        .get(id)
        .await
        .ok_or(ApiError::UploadNotFound { id: upload_id })?;

    let content = tokio::fs::read(&record.path).await.map_err(|e| {
        ApiError::Internal(anyhow::Error::new(e).context("failed to read stored upload"))
    })?;

    Ok(([(header::CONTENT_TYPE, record.mime_type.clone())], content).into_response())
}
