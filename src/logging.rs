//! File-based tracing setup.
//!
//! The session view owns the terminal, so log output goes to files under
//! `<home>/logs/` instead of stderr. The filter is controlled with `RUST_LOG`
//! and defaults to `info`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Log file name prefix; tracing-appender adds the date suffix.
const LOG_FILE_PREFIX: &str = "dj-console.log";

/// Initializes the global tracing subscriber writing to `<home>/logs/`.
///
/// Returns a guard that must stay alive for the process lifetime; dropping it
/// flushes and stops the background writer.
pub fn init(home: &Path) -> Result<WorkerGuard> {
    let dir = home.join("logs");
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::daily(&dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(guard)
}
