//! File logging. The terminal belongs to the UI, so every event goes to a
//! daily rolling file instead of stdout.

use anyhow::{anyhow, Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::GlobalConfig;

/// Environment variable that overrides the configured filter
pub const LOG_ENV: &str = "SDD_HUB_LOG";

/// Build the filter: `SDD_HUB_LOG` wins over the configured level
pub fn build_filter(configured: &str) -> EnvFilter {
    match std::env::var(LOG_ENV) {
        Ok(value) if !value.trim().is_empty() => EnvFilter::new(value),
        _ => EnvFilter::new(configured),
    }
}

/// Install the global subscriber. Keep the guard alive until exit or
/// buffered lines are lost.
pub fn init(config: &GlobalConfig) -> Result<WorkerGuard> {
    let dir = config.log_dir()?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory {:?}", dir))?;

    let appender = tracing_appender::rolling::daily(&dir, "sdd-hub.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(build_filter(&config.logging.level))
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow!("Failed to install log subscriber: {}", e))?;

    tracing::info!(dir = ?dir, "logging initialized");
    Ok(guard)
}
