//! Tracing subscriber setup for the service binary.
//!
//! The format and filter come from [`ServiceConfig`] (`LOG_FORMAT` and
//! `RUST_LOG`). JSON lines carry the fields of the request span opened by
//! [`MetricsLayer`](crate::middleware::MetricsLayer), so every event logged
//! while handling a request includes its `request_id`.

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::ServiceConfig;

/// Filter used when `RUST_LOG` is unset or does not parse.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// How log lines are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Json,
    /// Multi-line output for local runs.
    Text,
}

impl LogFormat {
    /// `text` and `pretty` select [`LogFormat::Text`]; anything else is JSON.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => LogFormat::Text,
            _ => LogFormat::Json,
        }
    }
}

/// Build an [`EnvFilter`] from `RUST_LOG`-style directives.
///
/// Missing or malformed directives fall back to [`DEFAULT_LOG_FILTER`]
/// instead of failing startup.
pub fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Install the global subscriber described by `config`.
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(config: &ServiceConfig) -> Result<(), TryInitError> {
    let registry = tracing_subscriber::registry().with(log_filter(config.log_filter.as_deref()));

    match config.log_format {
        LogFormat::Text => registry.with(fmt::layer().pretty()).try_init()?,
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false),
            )
            .try_init()?,
    }

    tracing::info!(format = ?config.log_format, "logging initialized");
    Ok(())
}
