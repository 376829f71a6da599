//! Shader Stripper Application Library
//!
//! Configuration, logging, manifest replay and command execution for the
//! `shader-stripper` binary.

pub mod app;
pub mod config;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod output;
pub mod setup;

pub use config::AppConfig;
pub use error::AppError;

// Re-export the main function so it can be called from the root crate
pub use crate::app::main;
