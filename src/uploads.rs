//! In-memory registry of uploaded files.
//!
//! Each upload gets an opaque UUID handle; conversion requests name the
//! handle they want converted. The registry also tracks the most recent
//! upload so the parameterless `/convert` keeps working for the
//! single-client flow (last write wins, by design).

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Metadata for one stored upload.
#[derive(Debug, Clone, Serialize)]
pub struct UploadRecord {
    pub id: Uuid,
    /// Sanitized client-supplied name, for display only.
    pub filename: String,
    /// Where the bytes live on disk. Not exposed through the API.
    #[serde(skip)]
    pub path: PathBuf,
    pub content_hash: String,
    pub size: u64,
    pub mime_type: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Default)]
struct RegistryInner {
    records: HashMap<Uuid, Arc<UploadRecord>>,
    /// Insertion order; the tail is the latest upload.
    order: Vec<Uuid>,
}

/// Registry of uploads for the process lifetime.
#[derive(Default)]
pub struct UploadRegistry {
    inner: RwLock<RegistryInner>,
}

impl UploadRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an upload and move the latest pointer to it.
    pub async fn insert(&self, record: UploadRecord) -> Arc<UploadRecord> {
        let record = Arc::new(record);
        let mut inner = self.inner.write().await;
        inner.order.push(record.id);
        inner.records.insert(record.id, Arc::clone(&record));
        record
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<UploadRecord>> {
        self.inner.read().await.records.get(&id).cloned()
    }

    /// The most recently registered upload, if any.
    pub async fn latest(&self) -> Option<Arc<UploadRecord>> {
        let inner = self.inner.read().await;
        inner
            .order
            .last()
            .and_then(|id| inner.records.get(id).cloned())
    }

    /// All uploads, newest first.
    pub async fn list(&self) -> Vec<Arc<UploadRecord>> {
        let inner = self.inner.read().await;
        inner
            .order
            .iter()
            .rev()
            .filter_map(|id| inner.records.get(id).cloned())
            .collect()
    }
}
