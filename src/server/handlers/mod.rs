//! HTTP request handlers for the web server.

mod convert;
mod static_files;
mod upload;
mod uploads_api;

// Re-export handlers for use by the router
pub use convert::{convert_latest, convert_upload};
pub use static_files::{serve_css, serve_index, serve_js};
pub use upload::upload_file;
pub use uploads_api::{api_upload, api_uploads, serve_upload_file};
