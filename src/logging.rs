//! Logging
//!
//! The TUI owns stdout, so all tracing output goes to a daily-rotated file.

use crate::config::{LoggingConfig, chatboat_home};
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILE_PREFIX: &str = "chatboat.log";

/// Where log files go: the configured directory or `~/.chatboat/logs`
pub fn log_dir(config: &LoggingConfig) -> PathBuf {
    config
        .dir
        .clone()
        .unwrap_or_else(|| chatboat_home().join("logs"))
}

/// `--debug` wins, then `RUST_LOG`, then the configured level
fn env_filter(level: &str, debug: bool) -> EnvFilter {
    if debug {
        return EnvFilter::new("debug");
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Install the global subscriber. Keep the returned guard alive until exit
/// or buffered lines are lost.
pub fn init(config: &LoggingConfig, debug: bool) -> Result<WorkerGuard> {
    let dir = log_dir(config);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::daily(&dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(env_filter(&config.level, debug))
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false),
        )
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::debug!("Logging to {}", dir.display());
    Ok(guard)
}
