//! Conversion handlers: run the OCR engine against a stored upload.

use std::sync::Arc;

use axum::extract::{Path, State};
use uuid::Uuid;

use crate::uploads::UploadRecord;

use super::super::error::{ApiError, Result};
use super::super::AppState;

/// `GET /convert` - convert the most recent upload.
///
/// Kept for the single-client flow; the latest pointer is last-write-wins,
/// so interleaved uploads from other clients move the target. Handle-based
/// conversion (`/convert/:upload_id`) is the race-free path.
pub async fn convert_latest(State(state): State<AppState>) -> Result<String> {
    let record = state.uploads.latest().await.ok_or(ApiError::NoUpload)?;
    run_engine(&state, record).await
}

/// `GET /convert/:upload_id` - convert a specific upload.
pub async fn convert_upload(
    State(state): State<AppState>,
    Path(upload_id): Path<String>,
) -> Result<String> {
    let id = upload_id
        .parse::<Uuid>()
        .map_err(|_| ApiError::UploadNotFound {
            id: upload_id.clone(),
        })?;
    let record = state
        .uploads
        .get(id)
        .await
        .ok_or(ApiError::UploadNotFound { id: upload_id })?;
    run_engine(&state, record).await
}

/// Run the engine and return its stdout as the response body. The engine
/// run is awaited inline: dropping the request future (client disconnect)
/// reaps the subprocess.
async fn run_engine(state: &AppState, record: Arc<UploadRecord>) -> Result<String> {
    tracing::debug!(id = %record.id, file = %record.path.display(), "converting upload");

    let output = state.engine.recognize(&record.path).await?;

    tracing::info!(
        id = %record.id,
        elapsed_ms = output.processing_time_ms,
        bytes = output.text.len(),
        "conversion finished"
    );
    Ok(output.text)
}
