//! Fuel route optimizer HTTP service.
//!
//! # Endpoints
//!
//! - `POST /api/v1/optimize-route` - Cheapest fuel stops between two locations
//! - `GET /api/v1/stations/{id}` - Station details
//! - `POST /api/v1/catalog/reload` - Re-read the station database
//! - `GET /metrics` - Prometheus metrics endpoint
//! - `GET /health/live` - Kubernetes liveness probe
//! - `GET /health/ready` - Kubernetes readiness probe
//!
//! # Configuration
//!
//! - `FUELROUTE_DB_PATH` - Station database (default: /data/stations.db)
//! - `MAPQUEST_API_KEY` - MapQuest key (required), `MAPQUEST_URL` optional
//! - `CACHE_TTL_SECS` - Geocode and route cache lifetime (default: 86400)
//! - `FUEL_MAX_RANGE_MILES`, `FUEL_MILES_PER_GALLON`, `FUEL_CORRIDOR_MILES`
//! - `RUST_LOG` - Log level (default: info)
//! - `LOG_FORMAT` - Log format: json (default) or text
//! - `SERVICE_PORT` - HTTP port (default: 8080)

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{error, info};

use fuelroute_lib::{CachingProvider, MapQuestClient, MapQuestConfig, VehicleConfig};
use fuelroute_service::{
    app, init_logging, init_metrics, record_catalog_size, AppState, MetricsConfig, ServiceConfig,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServiceConfig::from_env();
    init_logging(&config)?;

    let metrics_config = MetricsConfig::from_env();
    if let Err(e) = init_metrics(&metrics_config) {
        tracing::warn!(error = %e, "failed to initialize metrics, continuing without metrics");
    }

    let vehicle = VehicleConfig::from_env()?;
    info!(
        db_path = %config.db_path.display(),
        port = config.port,
        cache_ttl_secs = config.cache_ttl.as_secs(),
        max_range = vehicle.max_range_miles,
        miles_per_gallon = vehicle.miles_per_gallon,
        "starting fuel route service"
    );

    // The blocking HTTP client must be created and dropped outside the async
    // runtime; `maps` outlives the runtime below.
    let client = MapQuestClient::new(MapQuestConfig::from_env()?)?;
    let maps = Arc::new(CachingProvider::new(client, config.cache_ttl));

    let state = AppState::load(&config.db_path, maps.clone(), maps.clone(), vehicle).map_err(|e| {
        error!(error = %e, path = %config.db_path.display(), "failed to load application state");
        e
    })?;
    record_catalog_size(state.catalog().len());
    info!(stations = state.catalog().len(), "application state loaded");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(serve(state, config.port))?;
    drop(runtime);
    drop(maps);

    Ok(())
}

async fn serve(state: AppState, port: u16) -> std::io::Result<()> {
    let router = app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(addr = %addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await
}
