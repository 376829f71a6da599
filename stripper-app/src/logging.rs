//! Logging setup for the application.

use crate::config::{AppConfig, DecisionLogLevel, GlobalLogLevel};
use env_logger::{Builder, Env};
use log::LevelFilter;

/// Module that logs individual keep/strip decisions.
const DECISION_MODULE: &str = "stripper_core::engine";

/// Initializes the logger with the appropriate configuration based on the application settings.
///
/// This function configures the log levels for the different components of the application:
/// - Per-variant decisions use the level specified in `config.decision_log_level`
/// - Everything else uses `config.global_log_level`
///
/// `RUST_LOG` is read first, so directives for other modules still apply.
///
/// # Arguments
///
/// * `config` - The application configuration containing the log level settings
pub fn init_logger(config: &AppConfig) {
    let decision_level = match config.decision_log_level {
        DecisionLogLevel::Trace => LevelFilter::Trace,
        DecisionLogLevel::Debug => LevelFilter::Debug,
        DecisionLogLevel::Info => LevelFilter::Info,
        DecisionLogLevel::Warn => LevelFilter::Warn,
    };

    let global_level = match config.global_log_level {
        GlobalLogLevel::Trace => LevelFilter::Trace,
        GlobalLogLevel::Debug => LevelFilter::Debug,
        GlobalLogLevel::Info => LevelFilter::Info,
        GlobalLogLevel::Warn => LevelFilter::Warn,
        GlobalLogLevel::Error => LevelFilter::Error,
    };

    let env = Env::default().filter_or("RUST_LOG", "info");
    let mut builder = Builder::from_env(env);
    builder.filter_level(global_level);
    // Decision logging is filtered on its own, independent of the global level.
    builder.filter_module(DECISION_MODULE, decision_level);

    if builder.try_init().is_err() {
        log::debug!("Logger already initialized");
        return;
    }

    log::debug!(
        "Logger initialized with global log level: {:?}, decision log level: {:?}",
        config.global_log_level,
        config.decision_log_level
    );
}
