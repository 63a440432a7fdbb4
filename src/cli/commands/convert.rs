//! One-shot conversion command.

use std::path::Path;

use console::style;

use crate::config::Settings;
use crate::engine::EngineRunner;

/// Run the OCR engine against a local file and print the recognized text.
pub async fn cmd_convert(settings: &Settings, file: &Path) -> anyhow::Result<()> {
    if !file.exists() {
        anyhow::bail!("no such file: {}", file.display());
    }

    let runner = EngineRunner::new(settings.engine_config());
    let output = runner.recognize(file).await?;

    eprintln!(
        "{} {} ({} ms)",
        style("✓").green(),
        file.display(),
        output.processing_time_ms
    );
    println!("{}", output.text);
    Ok(())
}
