//! Storage helpers for uploaded file content on disk.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

/// Compute the SHA-256 hash of content, hex encoded.
pub fn compute_hash(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}

/// Make a client-supplied filename safe for display and for use as a stored
/// basename. Path separators, control characters and shell-hostile
/// characters become underscores; the result is trimmed and length-capped.
pub fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let trimmed = sanitized.trim().trim_matches('_');
    if trimmed.is_empty() {
        "upload".to_string()
    } else {
        trimmed.chars().take(100).collect()
    }
}

/// Detect the MIME type of uploaded content.
///
/// Sniffs the bytes first (magic numbers); falls back to guessing from the
/// original filename's extension.
pub fn detect_mime(content: &[u8], original_name: &str) -> String {
    match infer::get(content) {
        Some(kind) => kind.mime_type().to_string(),
        None => mime_guess::from_path(original_name)
            .first_or_octet_stream()
            .to_string(),
    }
}

/// Pick a storage extension for uploaded content: sniffed type first, then
/// the original filename's extension, then `bin`.
fn extension_for(content: &[u8], original_name: &str) -> String {
    if let Some(kind) = infer::get(content) {
        return kind.extension().to_string();
    }
    Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_else(|| "bin".to_string())
}

/// Construct the storage path for uploaded content.
///
/// Uses a two-level directory structure based on hash prefix for filesystem
/// efficiency: `{uploads_dir}/{hash[0..2]}/{stem}-{hash[0..8]}.{extension}`
pub fn upload_storage_path(
    uploads_dir: &Path,
    content_hash: &str,
    basename: &str,
    extension: &str,
) -> PathBuf {
    let stem = Path::new(basename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("upload");
    let filename = format!("{}-{}.{}", stem, &content_hash[..8], extension);
    uploads_dir.join(&content_hash[..2]).join(filename)
}

/// Metadata for upload content that has been written to disk.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub path: PathBuf,
    pub content_hash: String,
    pub mime_type: String,
}

/// Save uploaded bytes to disk under the hash-addressed layout.
///
/// `sanitized_name` must already have passed through [`sanitize_filename`];
/// it contributes only the stored basename, never a directory component.
pub fn save_upload(
    uploads_dir: &Path,
    sanitized_name: &str,
    content: &[u8],
) -> std::io::Result<StoredFile> {
    let content_hash = compute_hash(content);
    let mime_type = detect_mime(content, sanitized_name);
    let extension = extension_for(content, sanitized_name);
    let path = upload_storage_path(uploads_dir, &content_hash, sanitized_name, &extension);

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, content)?;

    Ok(StoredFile {
        path,
        content_hash,
        mime_type,
    })
}
