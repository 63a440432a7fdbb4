//! CLI commands implementation.

mod check;
mod convert;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::load_settings;

#[derive(Parser)]
#[command(name = "textsnap")]
#[command(about = "Image upload and OCR conversion service")]
#[command(version)]
pub struct Cli {
    /// Data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server
    Serve {
        /// Address to bind to: PORT, HOST, or HOST:PORT
        #[arg(default_value = "127.0.0.1:3030")]
        bind: String,
    },

    /// Run the OCR engine against a local file and print the text
    Convert {
        /// Image file to convert
        file: PathBuf,
    },

    /// Check whether the configured OCR engine is runnable
    Check,
}

/// Parse arguments and dispatch to the selected command.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(cli.data_dir.clone())?;

    match cli.command {
        Commands::Serve { bind } => serve::cmd_serve(&settings, &bind).await,
        Commands::Convert { file } => convert::cmd_convert(&settings, &file).await,
        Commands::Check => check::cmd_check(&settings),
    }
}
