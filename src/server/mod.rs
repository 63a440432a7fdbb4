//! Web server for the upload/convert pipeline.
//!
//! Serves the embedded browser client, the multipart upload endpoint, the
//! conversion endpoints backed by the external OCR engine, and a small
//! upload-metadata API.

mod assets;
mod error;
mod handlers;
mod routes;

pub use error::ApiError;
pub use routes::create_router;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Settings;
use crate::engine::EngineRunner;
use crate::uploads::UploadRegistry;

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub uploads: Arc<UploadRegistry>,
    pub engine: Arc<EngineRunner>,
    pub uploads_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        let uploads_dir = settings.uploads_dir();
        std::fs::create_dir_all(&uploads_dir)?;

        Ok(Self {
            uploads: Arc::new(UploadRegistry::new()),
            engine: Arc::new(EngineRunner::new(settings.engine_config())),
            uploads_dir,
            max_upload_bytes: settings.max_upload_bytes,
        })
    }
}

/// Start the web server.
pub async fn serve(settings: &Settings, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::new(settings)?;
    if !state.engine.is_available() {
        tracing::warn!("{}", state.engine.availability_hint());
    }
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tempfile::tempdir;
    use tower::ServiceExt;

    use crate::engine::EngineConfig;

    const TEST_MAX_UPLOAD: usize = 1024 * 1024;

    fn test_state(dir: &std::path::Path, max_upload_bytes: usize) -> AppState {
        let uploads_dir = dir.join("uploads");
        std::fs::create_dir_all(&uploads_dir).unwrap();
        AppState {
            uploads: Arc::new(UploadRegistry::new()),
            engine: Arc::new(EngineRunner::new(EngineConfig {
                command: "textsnap-no-such-engine".to_string(),
                args: vec![],
                timeout: Duration::from_secs(5),
            })),
            uploads_dir,
            max_upload_bytes,
        }
    }

    fn setup_test_app() -> (axum::Router, AppState, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let state = test_state(dir.path(), TEST_MAX_UPLOAD);
        let app = create_router(state.clone());
        (app, state, dir)
    }

    fn multipart_upload(filename: &str, bytes: &[u8]) -> Request<Body> {
        let boundary = "textsnap-test-boundary";
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/upload/file")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_upload_stores_bytes_and_registers_record() {
        let (app, state, _dir) = setup_test_app();
        let content = b"fake image bytes";

        let response = app.oneshot(multipart_upload("scan.png", content)).await.unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["status"], "success");
        assert_eq!(json["upload"]["filename"], "scan.png");
        assert_eq!(json["upload"]["size"], content.len() as u64);

        let id: uuid::Uuid = json["upload"]["id"].as_str().unwrap().parse().unwrap();
        let record = state.uploads.get(id).await.unwrap();
        assert_eq!(std::fs::read(&record.path).unwrap(), content);
        assert!(record.path.starts_with(&state.uploads_dir));
    }

    #[tokio::test]
    async fn test_upload_sanitizes_traversal_names() {
        let (app, state, _dir) = setup_test_app();

        let response = app
            .oneshot(multipart_upload("../../etc/passwd", b"payload"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        let id: uuid::Uuid = json["upload"]["id"].as_str().unwrap().parse().unwrap();
        let record = state.uploads.get(id).await.unwrap();
        assert!(record.path.starts_with(&state.uploads_dir));
        assert!(!record.filename.contains('/'));
    }

    #[tokio::test]
    async fn test_upload_rejects_empty_file() {
        let (app, _state, _dir) = setup_test_app();

        let response = app.oneshot(multipart_upload("empty.png", b"")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["status"], "error");
    }

    #[tokio::test]
    async fn test_upload_rejects_missing_file_field() {
        let (app, _state, _dir) = setup_test_app();

        // Only a plain text field, no filename
        let boundary = "textsnap-test-boundary";
        let body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"note\"\r\n\r\nhello\r\n--{boundary}--\r\n"
        );
        let request = Request::builder()
            .method("POST")
            .uri("/upload/file")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upload_rejects_oversized_file() {
        let dir = tempdir().unwrap();
        let state = test_state(dir.path(), 16);
        let app = create_router(state);

        let response = app
            .oneshot(multipart_upload("big.png", &[0u8; 64]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_convert_before_any_upload_is_deterministic_404() {
        let (app, _state, _dir) = setup_test_app();

        let response = app
            .oneshot(Request::builder().uri("/convert").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "no file has been uploaded yet");
    }

    #[tokio::test]
    async fn test_convert_unknown_handle_is_404() {
        let (app, _state, _dir) = setup_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/convert/{}", uuid::Uuid::new_v4()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_convert_malformed_handle_is_404() {
        let (app, _state, _dir) = setup_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/convert/not-a-uuid")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_convert_with_missing_engine_is_503() {
        let (app, state, _dir) = setup_test_app();

        let upload = app
            .clone()
            .oneshot(multipart_upload("scan.png", b"bytes"))
            .await
            .unwrap();
        assert_eq!(upload.status(), StatusCode::CREATED);
        assert!(state.uploads.latest().await.is_some());

        let response = app
            .oneshot(Request::builder().uri("/convert").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_api_uploads_empty() {
        let (app, _state, _dir) = setup_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/uploads")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json.as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_api_uploads_lists_newest_first() {
        let (app, _state, _dir) = setup_test_app();

        for name in ["a.png", "b.png"] {
            let response = app
                .clone()
                .oneshot(multipart_upload(name, name.as_bytes()))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/uploads")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let json = body_json(response).await;
        let list = json.as_array().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0]["filename"], "b.png");
        assert_eq!(list[1]["filename"], "a.png");
    }

    #[tokio::test]
    async fn test_api_upload_by_id() {
        let (app, _state, _dir) = setup_test_app();

        let upload = app
            .clone()
            .oneshot(multipart_upload("scan.png", b"bytes"))
            .await
            .unwrap();
        let json = body_json(upload).await;
        let id = json["upload"]["id"].as_str().unwrap().to_string();

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/uploads/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["id"], id.as_str());
        assert_eq!(json["filename"], "scan.png");
        // Server-side paths stay private
        assert!(json.get("path").is_none());
    }

    #[tokio::test]
    async fn test_serve_upload_file_roundtrip() {
        let (app, _state, _dir) = setup_test_app();
        let content = b"\x89PNG\r\n\x1a\n fake image";

        let upload = app
            .clone()
            .oneshot(multipart_upload("scan.png", content))
            .await
            .unwrap();
        let json = body_json(upload).await;
        let id = json["upload"]["id"].as_str().unwrap().to_string();

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/uploads/{id}/file"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        assert_eq!(content_type, "image/png");
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], content);
    }

    #[tokio::test]
    async fn test_index_page_served() {
        let (app, _state, _dir) = setup_test_app();

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("<!DOCTYPE html>"));
    }

    #[tokio::test]
    async fn test_static_assets_served() {
        let (app, _state, _dir) = setup_test_app();

        for (uri, expected_type) in [
            ("/static/style.css", "text/css"),
            ("/static/app.js", "application/javascript"),
        ] {
            let response = app
                .clone()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let content_type = response
                .headers()
                .get("content-type")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("");
            assert!(content_type.contains(expected_type));
        }
    }
}
