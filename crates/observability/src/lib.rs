//! # Observability
//!
//! Tracing setup and Prometheus metrics.
//!
//! ## Features
//!
//! - Tracing initialization (JSON/Pretty/Compact formats)
//! - In-process Prometheus recorder with a text snapshot written on exit
//! - Broadcast outcome metrics and network-time statistics
//!
//! ## Usage
//!
//! ```ignore
//! observability::init_with_config(ObservabilityConfig::default())?;
//! let recorder = observability::install_recorder()?;
//!
//! let outcome = dispatcher.dispatch_default(None).await?;
//! observability::record_broadcast_metrics(&outcome);
//! observability::write_metrics_snapshot(&recorder, "syncpost.prom")?;
//! ```

pub mod metrics;

use std::path::Path;

use anyhow::{Context, Result};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

// Re-exports
pub use crate::metrics::{
    network_time_stats, record_broadcast_metrics, record_target_count, RunningStats, StatsSummary,
};

/// Observability configuration
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Log output format
    pub log_format: LogFormat,
    /// Level used when RUST_LOG is unset
    pub default_log_level: String,
    /// Ignore RUST_LOG and always use `default_log_level`
    pub force_level: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            default_log_level: "info".to_string(),
            force_level: false,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Structured JSON
    Json,
    /// Human-readable multi-line
    #[default]
    Pretty,
    /// Single line per event
    Compact,
}

impl ObservabilityConfig {
    fn env_filter(&self) -> EnvFilter {
        if self.force_level {
            return EnvFilter::new(&self.default_log_level);
        }
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.default_log_level))
    }
}

/// Initialize tracing with the given configuration
///
/// Logs go to stderr; stdout is reserved for command output.
pub fn init_with_config(config: ObservabilityConfig) -> Result<()> {
    let filter = config.env_filter();

    let fmt_layer = match config.log_format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        LogFormat::Pretty => fmt::layer().pretty().with_writer(std::io::stderr).boxed(),
        LogFormat::Compact => fmt::layer().compact().with_writer(std::io::stderr).boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    tracing::debug!(log_format = ?config.log_format, "Observability initialized");

    Ok(())
}

/// Install the global Prometheus recorder without an HTTP listener
///
/// Render the returned handle with [`write_metrics_snapshot`] before exit.
pub fn install_recorder() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    tracing::debug!("Prometheus recorder installed");
    Ok(handle)
}

/// Write the Prometheus text exposition of `handle` to `path`
///
/// Goes through a sibling `.tmp` file and a rename.
pub fn write_metrics_snapshot(handle: &PrometheusHandle, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let rendered = handle.render();

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    std::fs::write(&tmp, rendered.as_bytes())
        .with_context(|| format!("Failed to write metrics to {:?}", tmp))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("Failed to move metrics into {}", path.display()))?;

    tracing::info!(path = %path.display(), bytes = rendered.len(), "Metrics snapshot written");
    Ok(())
}
