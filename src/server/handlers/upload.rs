//! Multipart upload handler.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::storage;
use crate::uploads::UploadRecord;

use super::super::error::{ApiError, Result};
use super::super::AppState;

/// Response body for a successful upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub status: &'static str,
    pub upload: UploadRecord,
}

/// Persist an uploaded file and register it under a fresh handle.
///
/// Accepts one file field (any multipart field carrying a filename); extra
/// text fields are ignored. Success is reported only after the bytes are on
/// disk - a failed write produces a structured error, never a success body.
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>)> {
    let mut filename: Option<String> = None;
    let mut content: Option<Vec<u8>> = None;

    while let Some(mut field) = multipart.next_field().await.map_err(|e| ApiError::BadRequest {
        message: format!("failed to parse multipart data: {e}"),
    })? {
        if field.file_name().is_none() {
            // Ignore non-file fields (forward compatibility)
            continue;
        }
        if content.is_some() {
            return Err(ApiError::BadRequest {
                message: "expected exactly one file field".to_string(),
            });
        }

        filename = field.file_name().map(|s| s.to_string());

        let mut buf = Vec::new();
        while let Some(chunk) = field.chunk().await.map_err(|e| ApiError::BadRequest {
            message: format!("failed to read file chunk: {e}"),
        })? {
            buf.extend_from_slice(&chunk);
            // Check the limit incrementally to fail fast
            if buf.len() > state.max_upload_bytes {
                return Err(ApiError::TooLarge {
                    limit: state.max_upload_bytes,
                });
            }
        }
        content = Some(buf);
    }

    let content = content.ok_or_else(|| ApiError::BadRequest {
        message: "missing file field".to_string(),
    })?;
    if content.is_empty() {
        return Err(ApiError::BadRequest {
            message: "file cannot be empty".to_string(),
        });
    }

    let name = storage::sanitize_filename(filename.as_deref().unwrap_or(""));

    let stored = storage::save_upload(&state.uploads_dir, &name, &content).map_err(|e| {
        ApiError::Internal(anyhow::Error::new(e).context("failed to persist upload"))
    })?;

    let record = state
        .uploads
        .insert(UploadRecord {
            id: Uuid::new_v4(),
            filename: name,
            path: stored.path,
            content_hash: stored.content_hash,
            size: content.len() as u64,
            mime_type: stored.mime_type,
            created_at: Utc::now(),
        })
        .await;

    tracing::info!(
        id = %record.id,
        filename = %record.filename,
        size = record.size,
        "stored upload"
    );

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            status: "success",
            upload: (*record).clone(),
        }),
    ))
}
