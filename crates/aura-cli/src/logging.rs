//! Tracing setup for the binary.
//!
//! Logs go to a daily rolling file so the terminal stays reserved for the
//! conversation. `--verbose` mirrors them to stderr.

use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const LOG_FILE_PREFIX: &str = "aura.log";

/// Installs the global subscriber. Keep the returned guard alive until exit
/// or buffered lines are lost.
pub fn init(logs_dir: &Path, verbose: bool) -> Result<WorkerGuard> {
    std::fs::create_dir_all(logs_dir)
        .with_context(|| format!("Failed to create log directory {}", logs_dir.display()))?;

    let file_appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE_PREFIX);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr_layer = verbose.then(|| fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(file_writer).with_ansi(false))
        .with(stderr_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}
