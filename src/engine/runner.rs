//! Subprocess execution for the OCR engine.

use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::{debug, warn};

use super::EngineConfig;

/// Errors from engine invocation.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine not available: {0}")]
    NotAvailable(String),

    #[error("engine failed ({status}): {stderr}")]
    Failed {
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("engine timed out after {0:?}")]
    TimedOut(Duration),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of one engine run.
#[derive(Debug, Clone)]
pub struct EngineOutput {
    /// Recognized text: the engine's stdout, chunks concatenated in arrival
    /// order. May be empty - an engine that prints nothing is not an error.
    pub text: String,
    /// Wall-clock processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Runs the external OCR engine against files on disk.
#[derive(Debug, Clone)]
pub struct EngineRunner {
    config: EngineConfig,
}

impl EngineRunner {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn is_available(&self) -> bool {
        self.config.is_available()
    }

    pub fn availability_hint(&self) -> String {
        self.config.availability_hint()
    }

    /// Run the engine against `path` and collect its stdout to completion.
    ///
    /// The engine receives the absolute path of the file. The run is bounded
    /// by the configured deadline; on timeout the subprocess is killed, and
    /// kill-on-drop reaps it if the caller's future is dropped mid-run.
    pub async fn recognize(&self, path: &Path) -> Result<EngineOutput, EngineError> {
        let start = Instant::now();

        let file = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };

        let mut cmd = Command::new(&self.config.command);
        cmd.args(self.config.build_args(&file))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!(
            command = %self.config.command,
            file = %file.display(),
            "spawning OCR engine"
        );

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(EngineError::NotAvailable(format!(
                    "{} not found in PATH",
                    self.config.command
                )));
            }
            Err(e) => return Err(EngineError::Io(e)),
        };

        let mut stdout = child.stdout.take();
        let mut stderr = child.stderr.take();

        let consume = async {
            let mut out_buf = Vec::new();
            let mut err_buf = Vec::new();
            let read_out = async {
                if let Some(out) = stdout.as_mut() {
                    out.read_to_end(&mut out_buf).await?;
                }
                Ok::<_, std::io::Error>(())
            };
            let read_err = async {
                if let Some(err) = stderr.as_mut() {
                    err.read_to_end(&mut err_buf).await?;
                }
                Ok::<_, std::io::Error>(())
            };
            tokio::try_join!(read_out, read_err)?;
            let status = child.wait().await?;
            Ok::<_, std::io::Error>((status, out_buf, err_buf))
        };

        let deadline = self.config.timeout;
        match tokio::time::timeout(deadline, consume).await {
            Ok(Ok((status, out_buf, err_buf))) => {
                if status.success() {
                    Ok(EngineOutput {
                        text: String::from_utf8_lossy(&out_buf).into_owned(),
                        processing_time_ms: start.elapsed().as_millis() as u64,
                    })
                } else {
                    let stderr = String::from_utf8_lossy(&err_buf).trim().to_string();
                    warn!(status = %status, %stderr, "OCR engine failed");
                    Err(EngineError::Failed { status, stderr })
                }
            }
            Ok(Err(e)) => Err(EngineError::Io(e)),
            Err(_) => {
                let _ = child.start_kill();
                let _ = child.wait().await;
                warn!(
                    command = %self.config.command,
                    timeout_secs = deadline.as_secs(),
                    "OCR engine timed out, killed"
                );
                Err(EngineError::TimedOut(deadline))
            }
        }
    }
}
