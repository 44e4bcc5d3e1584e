//! CLI command implementations

pub mod cook;
pub mod demo;
pub mod logs;
pub mod pantry;
pub mod recipe;
pub mod recognize;
pub mod status;
pub mod user;

use std::path::PathBuf;

use anyhow::{Context, Result};
use larder_core::services::{LogEvent, LoggingService};
use larder_core::LarderContext;

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<LoggingService> {
    let larder_dir = get_larder_dir();
    std::fs::create_dir_all(&larder_dir).ok()?;
    LoggingService::new(&larder_dir, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Get the larder directory from environment or default
pub fn get_larder_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("LARDER_DIR") {
        PathBuf::from(dir)
    } else {
        dirs::home_dir()
            .expect("Could not find home directory")
            .join(".larder")
    }
}

/// Get or create larder context
pub fn get_context() -> Result<LarderContext> {
    let larder_dir = get_larder_dir();

    std::fs::create_dir_all(&larder_dir)
        .with_context(|| format!("Failed to create larder directory: {:?}", larder_dir))?;

    LarderContext::new(&larder_dir).context("Failed to initialize larder context")
}
