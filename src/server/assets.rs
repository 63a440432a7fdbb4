//! Static asset constants for the embedded browser client.

/// Client page markup.
pub const INDEX: &str = include_str!("index.html");

/// Stylesheet for the client page.
pub const CSS: &str = include_str!("styles.css");

/// Upload/convert flow logic.
pub const JS: &str = include_str!("app.js");
