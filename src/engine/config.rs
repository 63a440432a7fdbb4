//! Engine command configuration.

use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;

/// Configuration for the external OCR engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Program to invoke.
    pub command: String,
    /// Argument template. `{file}` inside an argument is replaced with the
    /// target path; if no argument carries the placeholder, the path is
    /// appended as the final positional argument.
    pub args: Vec<String>,
    /// Per-run deadline.
    pub timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            command: "tesseract".to_string(),
            args: vec![
                "{file}".to_string(),
                "stdout".to_string(),
                "-l".to_string(),
                "eng".to_string(),
            ],
            timeout: Duration::from_secs(60),
        }
    }
}

impl EngineConfig {
    /// Expand the argument template for a target file.
    pub fn build_args(&self, file: &Path) -> Vec<OsString> {
        let file_str = file.to_string_lossy();
        let mut args: Vec<OsString> = Vec::with_capacity(self.args.len() + 1);
        let mut substituted = false;

        for arg in &self.args {
            if arg.contains("{file}") {
                substituted = true;
                args.push(OsString::from(arg.replace("{file}", &file_str)));
            } else {
                args.push(OsString::from(arg));
            }
        }
        if !substituted {
            args.push(file.as_os_str().to_os_string());
        }
        args
    }

    /// Check whether the engine command is runnable.
    pub fn is_available(&self) -> bool {
        which::which(&self.command).is_ok()
    }

    /// Human-readable availability description.
    pub fn availability_hint(&self) -> String {
        if self.is_available() {
            format!("{} is available", self.command)
        } else {
            format!(
                "{} not found (install it, or point TEXTSNAP_ENGINE at an OCR command)",
                self.command
            )
        }
    }
}
