//! Configuration management for Textsnap.
//!
//! Settings resolve from built-in defaults, then an optional TOML file in
//! the data directory (`textsnap.toml` or `config.toml`), then environment
//! variables. A `.env` file is loaded at startup before any of this runs.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

use crate::engine::EngineConfig;

/// Hard ceiling on the engine deadline.
const MAX_TIMEOUT_SECS: u64 = 600;
/// Default per-run engine deadline.
const DEFAULT_TIMEOUT_SECS: u64 = 60;
/// Default multipart upload cap (32 MiB).
const DEFAULT_MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

fn default_engine_args() -> Vec<String> {
    vec![
        "{file}".to_string(),
        "stdout".to_string(),
        "-l".to_string(),
        "eng".to_string(),
    ]
}

/// File-format view of the configuration. Every field is optional; missing
/// values fall through to env/defaults.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    engine: FileEngine,
    #[serde(default)]
    server: FileServer,
}

#[derive(Debug, Default, Deserialize)]
struct FileEngine {
    command: Option<String>,
    args: Option<Vec<String>>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct FileServer {
    max_upload_bytes: Option<usize>,
}

/// Resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Root for stored state; uploads live in `{data_dir}/uploads`.
    pub data_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub engine_command: String,
    pub engine_args: Vec<String>,
    /// Engine deadline in seconds; 0 means "no limit" and is clamped to the
    /// hard ceiling.
    pub timeout_secs: u64,
}

impl Settings {
    pub fn uploads_dir(&self) -> PathBuf {
        self.data_dir.join("uploads")
    }

    pub fn engine_config(&self) -> EngineConfig {
        let secs = if self.timeout_secs == 0 {
            MAX_TIMEOUT_SECS
        } else {
            self.timeout_secs.min(MAX_TIMEOUT_SECS)
        };
        EngineConfig {
            command: self.engine_command.clone(),
            args: self.engine_args.clone(),
            timeout: Duration::from_secs(secs),
        }
    }
}

/// Look for a config file in the data directory.
fn find_config_file(data_dir: &Path) -> Option<PathBuf> {
    for basename in ["textsnap", "config"] {
        let path = data_dir.join(format!("{basename}.toml"));
        if path.exists() {
            return Some(path);
        }
    }
    None
}

/// Environment variable, if set and non-empty.
fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Load settings. Precedence, lowest to highest: defaults, config file,
/// environment, the `--data-dir` CLI flag (passed in here).
pub fn load_settings(data_dir: Option<PathBuf>) -> anyhow::Result<Settings> {
    let data_dir = data_dir
        .or_else(|| env_var("TEXTSNAP_DATA_DIR").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("data"));

    let file = match find_config_file(&data_dir) {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            toml::from_str::<FileConfig>(&raw)
                .with_context(|| format!("invalid config file {}", path.display()))?
        }
        None => FileConfig::default(),
    };

    let engine_command = env_var("TEXTSNAP_ENGINE")
        .or(file.engine.command)
        .unwrap_or_else(|| "tesseract".to_string());

    let engine_args = env_var("TEXTSNAP_ENGINE_ARGS")
        .map(|raw| raw.split_whitespace().map(String::from).collect())
        .or(file.engine.args)
        .unwrap_or_else(default_engine_args);

    let timeout_secs = match env_var("TEXTSNAP_TIMEOUT_SECS") {
        Some(raw) => raw
            .parse::<u64>()
            .with_context(|| format!("invalid TEXTSNAP_TIMEOUT_SECS value: {raw}"))?,
        None => file.engine.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
    };

    let max_upload_bytes = file
        .server
        .max_upload_bytes
        .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);

    Ok(Settings {
        data_dir,
        max_upload_bytes,
        engine_command,
        engine_args,
        timeout_secs,
    })
}
