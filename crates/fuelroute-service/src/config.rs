//! Service settings read from the environment.

use std::path::PathBuf;
use std::time::Duration;

use fuelroute_lib::provider::DEFAULT_CACHE_TTL;

use crate::logging::LogFormat;

/// Station database used when `FUELROUTE_DB_PATH` is unset.
pub const DEFAULT_DB_PATH: &str = "/data/stations.db";

/// Port used when `SERVICE_PORT` is unset or unparseable.
pub const DEFAULT_PORT: u16 = 8080;

/// Process-level settings for the HTTP service.
///
/// - `FUELROUTE_DB_PATH`: station database (default `/data/stations.db`)
/// - `SERVICE_PORT`: listen port (default 8080)
/// - `CACHE_TTL_SECS`: lifetime of cached geocodes and routes (default one day)
/// - `LOG_FORMAT`: `json` (default) or `text`
/// - `RUST_LOG`: tracing filter directives (default `info`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub db_path: PathBuf,
    pub port: u16,
    pub cache_ttl: Duration,
    pub log_format: LogFormat,
    pub log_filter: Option<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            port: DEFAULT_PORT,
            cache_ttl: DEFAULT_CACHE_TTL,
            log_format: LogFormat::Json,
            log_filter: None,
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Unparseable values fall back
    /// to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            db_path: lookup("FUELROUTE_DB_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            port: lookup("SERVICE_PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(defaults.port),
            cache_ttl: lookup("CACHE_TTL_SECS")
                .and_then(|s| s.trim().parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.cache_ttl),
            log_format: lookup("LOG_FORMAT")
                .map(|f| LogFormat::parse(&f))
                .unwrap_or(defaults.log_format),
            log_filter: lookup("RUST_LOG").filter(|f| !f.trim().is_empty()),
        }
    }
}
