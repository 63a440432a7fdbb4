//! OCR engine subprocess boundary.
//!
//! The recognition logic lives in an external program invoked with a file
//! path; whatever it prints to stdout is the conversion result. The default
//! engine is Tesseract (`tesseract {file} stdout -l eng`), but any command
//! matching that contract can be configured, e.g. a Python script.

mod config;
mod runner;

pub use config::EngineConfig;
pub use runner::{EngineError, EngineOutput, EngineRunner};
