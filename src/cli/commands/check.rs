//! Engine availability check command.

use console::style;

use crate::config::Settings;
use crate::engine::EngineRunner;

/// Report whether the configured OCR engine is runnable.
pub fn cmd_check(settings: &Settings) -> anyhow::Result<()> {
    let runner = EngineRunner::new(settings.engine_config());

    if runner.is_available() {
        println!("{} {}", style("✓").green(), runner.availability_hint());
        Ok(())
    } else {
        println!("{} {}", style("✗").red(), runner.availability_hint());
        anyhow::bail!("OCR engine is not available")
    }
}
