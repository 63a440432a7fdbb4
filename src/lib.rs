//! Textsnap - image upload and OCR conversion service.
//!
//! A browser front end uploads an image file; the server persists it and
//! invokes an external OCR engine as a subprocess, returning whatever text
//! the engine prints to standard output. The recognition logic itself lives
//! entirely outside this crate - any program that accepts a file path and
//! writes text to stdout can serve as the engine.

pub mod cli;
pub mod config;
pub mod engine;
pub mod server;
pub mod storage;
pub mod uploads;
