//! Liveness and readiness endpoints.
//!
//! `/health/live` only shows that the process answers. `/health/ready` looks
//! at the catalog snapshot: while it holds no stations every trip longer than
//! one tank fails with `no-fuel-stations`, so the instance reports 503 until a
//! reload installs stations.

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::AppState;

const STATUS_OK: &str = "ok";
const STATUS_NOT_READY: &str = "not_ready";

/// Body returned by both health endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// `ok` or `not_ready`.
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stations_loaded: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_loaded_at: Option<String>,
}

impl HealthStatus {
    pub fn live() -> Self {
        Self {
            status: STATUS_OK.to_string(),
            reason: None,
            version: env!("CARGO_PKG_VERSION").to_string(),
            stations_loaded: None,
            catalog_loaded_at: None,
        }
    }

    /// Readiness of a snapshot holding `stations` stations installed at `loaded_at`.
    pub fn for_catalog(stations: usize, loaded_at: DateTime<Utc>) -> (StatusCode, Self) {
        let mut status = Self::live();
        status.stations_loaded = Some(stations);
        status.catalog_loaded_at = Some(loaded_at.to_rfc3339_opts(SecondsFormat::Secs, true));

        if stations == 0 {
            status.status = STATUS_NOT_READY.to_string();
            status.reason = Some("no stations loaded".to_string());
            return (StatusCode::SERVICE_UNAVAILABLE, status);
        }
        (StatusCode::OK, status)
    }

    pub fn is_ready(&self) -> bool {
        self.status == STATUS_OK
    }
}

pub async fn health_live() -> Json<HealthStatus> {
    Json(HealthStatus::live())
}

pub async fn health_ready(State(state): State<AppState>) -> (StatusCode, Json<HealthStatus>) {
    let (stations, loaded_at) = state.catalog_status();
    let (code, status) = HealthStatus::for_catalog(stations, loaded_at);
    if !status.is_ready() {
        tracing::debug!(stations, "readiness check failed");
    }
    (code, Json(status))
}
