//! HTTP service for the fuel route optimizer.
//!
//! This crate wraps `fuelroute-lib` in an axum application:
//!
//! - [`AppState`]: Catalog snapshot plus the geocoding and directions providers
//! - [`app`]: The router with every endpoint and middleware installed
//! - [`health`]: Liveness and readiness probes
//! - [`ProblemDetails`]: RFC 9457 Problem Details for error responses
//! - [`ServiceResponse`]: Wrapper for successful responses with content type
//! - [`metrics`]: Prometheus metrics
//! - [`logging`]: Structured JSON logging setup
//! - [`middleware`]: Request IDs and HTTP metrics
//!
//! # Architecture
//!
//! Handlers are thin; all planning logic lives in `fuelroute-lib`:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  axum Handler                                               │
//! │  - Parse and validate request JSON                          │
//! │  - Geocode, route and plan on a blocking thread             │
//! │  - Format response or problem                               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Testing Support
//!
//! The [`test_utils`] module provides the station fixture and an offline
//! maps provider. Enable the `test-utils` feature to use it from other crates.

mod config;
mod handlers;
mod health;
pub mod logging;
pub mod metrics;
pub mod middleware;
mod problem;
mod request;
mod response;
mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::{ServiceConfig, DEFAULT_DB_PATH, DEFAULT_PORT};
pub use handlers::{app, optimize_route, reload_catalog, station_details};
pub use health::{health_live, health_ready, HealthStatus};
pub use logging::{init_logging, log_filter, LogFormat, DEFAULT_LOG_FILTER};
pub use metrics::{
    init_metrics, metrics_handler, record_catalog_size, record_plan_computed, record_plan_failed,
    record_plan_stops, MetricsConfig, MetricsError,
};
pub use middleware::{extract_or_generate_request_id, MetricsLayer, RequestId};
pub use problem::{
    from_lib_error, ProblemDetails, PROBLEM_DESTINATION_UNREACHABLE, PROBLEM_INTERNAL_ERROR,
    PROBLEM_INVALID_REQUEST, PROBLEM_LOCATION_NOT_FOUND, PROBLEM_NO_FUEL_STATIONS,
    PROBLEM_ROUTE_NOT_FOUND, PROBLEM_SERVICE_UNAVAILABLE, PROBLEM_UNKNOWN_STATION,
    PROBLEM_UPSTREAM_UNAVAILABLE,
};
pub use request::{OptimizeRouteRequest, Validate};
pub use response::{
    FuelStopView, OptimizeRouteResponse, ReloadResponse, ServiceResponse, StationView,
};
pub use state::{AppState, AppStateError};
