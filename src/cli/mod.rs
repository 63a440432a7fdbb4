//! Command-line interface for Textsnap.

mod commands;

pub use commands::{is_verbose, run};
