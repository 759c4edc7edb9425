//! HTTP handlers and the router that serves them.
//!
//! Handlers stay thin: validate, hand the blocking work to
//! `spawn_blocking`, and translate the result into a response body or an
//! RFC 9457 problem.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::Method,
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};

use fuelroute_lib::{plan_fuel_stops, Error as LibError, PlanResult, Route, StationId};

use crate::metrics::{
    metrics_handler, record_catalog_size, record_plan_computed, record_plan_failed,
    record_plan_stops,
};
use crate::middleware::{MetricsLayer, RequestId, REQUEST_ID_HEADER};
use crate::{
    from_lib_error, health_live, health_ready, AppState, AppStateError, OptimizeRouteRequest,
    OptimizeRouteResponse, ProblemDetails, ReloadResponse, ServiceResponse, StationView, Validate,
};

/// Build the service router over `state`.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
        .expose_headers([REQUEST_ID_HEADER]);

    Router::new()
        .route("/api/v1/optimize-route", post(optimize_route))
        .route("/api/v1/stations/{id}", get(station_details))
        .route("/api/v1/catalog/reload", post(reload_catalog))
        .route("/metrics", get(metrics_handler))
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready))
        .layer(cors)
        .layer(MetricsLayer)
        .with_state(state)
}

fn request_id(extension: Option<Extension<RequestId>>) -> String {
    extension
        .map(|Extension(id)| id)
        .unwrap_or_else(RequestId::generate)
        .0
}

/// Metric label for a failed plan.
fn failure_reason(error: &LibError) -> &'static str {
    match error {
        LibError::InvalidInput { .. } => "validation_error",
        LibError::GeocodeFailure { .. } => "geocode",
        LibError::RoutingFailure { .. } => "no_route",
        LibError::UnreachableDestination { .. } => "unreachable",
        LibError::EmptyCatalog { .. } => "no_stations",
        LibError::Http(_) | LibError::Io(_) => "upstream",
        _ => "internal_error",
    }
}

/// Handle `POST /api/v1/optimize-route`.
///
/// Geocodes both ends, fetches the driving route, then plans fuel stops
/// against the catalog snapshot taken when the request arrived.
pub async fn optimize_route(
    State(state): State<AppState>,
    request_id_ext: Option<Extension<RequestId>>,
    payload: Result<Json<OptimizeRouteRequest>, JsonRejection>,
) -> Response {
    let request_id = request_id(request_id_ext);

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            record_plan_failed("validation_error");
            return ProblemDetails::bad_request(rejection.body_text(), &request_id)
                .into_response();
        }
    };
    if let Err(problem) = request.validate(&request_id) {
        record_plan_failed("validation_error");
        return (*problem).into_response();
    }

    let vehicle = request.vehicle(&state.vehicle());
    info!(
        start = %request.start,
        end = %request.end,
        max_range = vehicle.max_range_miles,
        miles_per_gallon = vehicle.miles_per_gallon,
        "handling optimize-route request"
    );

    let catalog = state.catalog();
    let geocoder = state.geocoder();
    let directions = state.directions();
    let joined = tokio::task::spawn_blocking(move || -> fuelroute_lib::Result<(Route, PlanResult)> {
        let origin = geocoder.geocode(&request.start)?;
        let destination = geocoder.geocode(&request.end)?;
        let route = directions.route(origin, destination)?;
        let plan = plan_fuel_stops(&route, &catalog, &vehicle)?;
        Ok((route, plan))
    })
    .await;

    let (route, plan) = match joined {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(e)) => {
            record_plan_failed(failure_reason(&e));
            let problem = from_lib_error(&e, &request_id);
            if problem.status >= 500 {
                error!(error = %e, "fuel planning failed");
            } else {
                warn!(error = %e, "fuel planning rejected");
            }
            return problem.into_response();
        }
        Err(e) => {
            record_plan_failed("internal_error");
            error!(error = %e, "planning task did not complete");
            return ProblemDetails::internal_error("Planning task failed", &request_id)
                .into_response();
        }
    };

    record_plan_computed(plan.is_direct());
    record_plan_stops(plan.stops.len(), plan.total_distance);
    info!(
        stops = plan.stops.len(),
        total_distance = plan.total_distance,
        total_fuel_cost = plan.total_fuel_cost,
        "fuel plan computed"
    );

    ServiceResponse::new(OptimizeRouteResponse::new(&route, &plan)).into_response()
}

/// Handle `GET /api/v1/stations/{id}` from the current snapshot.
pub async fn station_details(
    State(state): State<AppState>,
    request_id_ext: Option<Extension<RequestId>>,
    id: Result<Path<StationId>, PathRejection>,
) -> Response {
    let request_id = request_id(request_id_ext);

    let Path(id) = match id {
        Ok(id) => id,
        Err(rejection) => {
            return ProblemDetails::bad_request(rejection.body_text(), &request_id)
                .into_response();
        }
    };

    match state.catalog().get(id) {
        Some(station) => ServiceResponse::new(StationView::from(station)).into_response(),
        None => ProblemDetails::unknown_station(id, &request_id).into_response(),
    }
}

/// Handle `POST /api/v1/catalog/reload`.
///
/// Reads the station database again and swaps in the new snapshot.
/// Requests already planning keep the snapshot they started with.
pub async fn reload_catalog(
    State(state): State<AppState>,
    request_id_ext: Option<Extension<RequestId>>,
) -> Response {
    let request_id = request_id(request_id_ext);

    let reloader = state.clone();
    let joined = tokio::task::spawn_blocking(move || reloader.reload()).await;

    match joined {
        Ok(Ok((stations_loaded, loaded_at))) => {
            record_catalog_size(stations_loaded);
            ServiceResponse::new(ReloadResponse {
                stations_loaded,
                loaded_at: loaded_at.to_rfc3339(),
            })
            .into_response()
        }
        Ok(Err(AppStateError::CatalogLoad(e))) => {
            error!(error = %e, "catalog reload failed");
            from_lib_error(&e, &request_id).into_response()
        }
        Ok(Err(e)) => {
            warn!(error = %e, "catalog reload unavailable");
            ProblemDetails::service_unavailable(e.to_string(), &request_id).into_response()
        }
        Err(e) => {
            error!(error = %e, "reload task did not complete");
            ProblemDetails::internal_error("Reload task failed", &request_id).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;

    use axum::http::{HeaderName, HeaderValue};
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    use fuelroute_lib::{
        import_stations_from_path, round_currency, DirectionsProvider, Geocoder, ImportOptions,
        StationCatalog, VehicleConfig,
    };

    use super::*;
    use crate::test_utils::{
        fixture_catalog, fixture_places, test_state, FakeMaps, TEST_FIXTURE_PATH,
    };

    fn server(state: AppState) -> TestServer {
        TestServer::new(app(state)).unwrap()
    }

    fn state_with(catalog: StationCatalog) -> AppState {
        let maps = Arc::new(FakeMaps::default());
        AppState::from_components(catalog, maps.clone(), maps, VehicleConfig::default())
    }

    #[tokio::test]
    async fn plans_cheapest_stops_along_i40() {
        let server = server(test_state());
        let response = server
            .post("/api/v1/optimize-route")
            .json(&json!({
                "start": fixture_places::OKLAHOMA_CITY,
                "end": fixture_places::FLAGSTAFF,
            }))
            .await;
        response.assert_status_ok();
        let body: OptimizeRouteResponse = response.json();

        let ids: Vec<i64> = body.fuel_stops.iter().map(|s| s.station.id).collect();
        assert_eq!(ids, vec![36, 51]);
        assert_eq!(body.route.len(), 5);

        let maps = FakeMaps::default();
        let origin = maps.geocode(fixture_places::OKLAHOMA_CITY).unwrap();
        let destination = maps.geocode(fixture_places::FLAGSTAFF).unwrap();
        let route = maps.route(origin, destination).unwrap();
        let expected =
            plan_fuel_stops(&route, &fixture_catalog(), &VehicleConfig::default()).unwrap();

        assert_eq!(body.total_distance, round_currency(route.total_distance()));
        assert_eq!(body.total_fuel_cost, round_currency(expected.total_fuel_cost));
        // Only the miles beyond the first tank are bought.
        let bought = (route.total_distance() - 500.0) / 10.0;
        assert!((body.total_gallons - bought).abs() < 0.01);
    }

    #[tokio::test]
    async fn response_carries_content_type_and_request_id() {
        let server = server(test_state());
        let response = server
            .post("/api/v1/optimize-route")
            .add_header(
                HeaderName::from_static("x-request-id"),
                HeaderValue::from_static("trip-42"),
            )
            .json(&json!({
                "from": fixture_places::OKLAHOMA_CITY,
                "to": fixture_places::AMARILLO,
            }))
            .await;
        response.assert_status_ok();
        assert_eq!(response.header("x-request-id"), "trip-42");

        let body: Value = response.json();
        assert_eq!(body["content_type"], "application/json");
        assert_eq!(body["fuel_stops"], json!([]));
        assert_eq!(body["total_fuel_cost"], 0.0);
    }

    #[tokio::test]
    async fn short_range_override_is_unreachable() {
        let server = server(test_state());
        let response = server
            .post("/api/v1/optimize-route")
            .add_header(
                HeaderName::from_static("x-request-id"),
                HeaderValue::from_static("short-range"),
            )
            .json(&json!({
                "start": fixture_places::OKLAHOMA_CITY,
                "end": fixture_places::FLAGSTAFF,
                "max_range": 200,
            }))
            .await;
        assert_eq!(response.status_code(), 422);
        let problem: Value = response.json();
        assert_eq!(problem["type"], "/problems/destination-unreachable");
        assert_eq!(problem["instance"], "short-range");
    }

    #[tokio::test]
    async fn trip_without_stations_has_no_fuel_stations() {
        let server = server(test_state());
        let response = server
            .post("/api/v1/optimize-route")
            .json(&json!({
                "start": fixture_places::SEATTLE,
                "end": fixture_places::SALT_LAKE_CITY,
            }))
            .await;
        assert_eq!(response.status_code(), 422);
        let problem: Value = response.json();
        assert_eq!(problem["type"], "/problems/no-fuel-stations");
    }

    #[tokio::test]
    async fn unknown_location_is_not_found() {
        let server = server(test_state());
        let response = server
            .post("/api/v1/optimize-route")
            .json(&json!({"start": "Atlantis", "end": fixture_places::FLAGSTAFF}))
            .await;
        assert_eq!(response.status_code(), 404);
        let problem: Value = response.json();
        assert_eq!(problem["type"], "/problems/location-not-found");
        assert!(problem["detail"].as_str().unwrap().contains("Atlantis"));
    }

    #[tokio::test]
    async fn unroutable_trip_is_route_not_found() {
        let server = server(test_state());
        let response = server
            .post("/api/v1/optimize-route")
            .json(&json!({
                "start": fixture_places::HONOLULU,
                "end": fixture_places::FLAGSTAFF,
            }))
            .await;
        assert_eq!(response.status_code(), 404);
        let problem: Value = response.json();
        assert_eq!(problem["type"], "/problems/route-not-found");
    }

    #[tokio::test]
    async fn invalid_requests_are_bad_requests() {
        let server = server(test_state());

        let empty = server
            .post("/api/v1/optimize-route")
            .json(&json!({"start": "", "end": fixture_places::FLAGSTAFF}))
            .await;
        assert_eq!(empty.status_code(), 400);

        let negative = server
            .post("/api/v1/optimize-route")
            .json(&json!({
                "start": fixture_places::AMARILLO,
                "end": fixture_places::FLAGSTAFF,
                "miles_per_gallon": -3,
            }))
            .await;
        assert_eq!(negative.status_code(), 400);

        let missing = server
            .post("/api/v1/optimize-route")
            .json(&json!({"start": fixture_places::AMARILLO}))
            .await;
        assert_eq!(missing.status_code(), 400);
        let problem: Value = missing.json();
        assert_eq!(problem["type"], "/problems/invalid-request");
    }

    #[tokio::test]
    async fn station_details_by_id() {
        let server = server(test_state());

        let found = server.get("/api/v1/stations/36").await;
        found.assert_status_ok();
        let station: Value = found.json();
        assert_eq!(station["name"], "PILOT TRAVEL CENTER #341");
        assert_eq!(station["location"], json!([35.1992, -101.845]));

        let missing = server.get("/api/v1/stations/12345").await;
        assert_eq!(missing.status_code(), 404);
        let problem: Value = missing.json();
        assert_eq!(problem["type"], "/problems/unknown-station");

        let malformed = server.get("/api/v1/stations/pilot").await;
        assert_eq!(malformed.status_code(), 400);
    }

    #[tokio::test]
    async fn reload_swaps_in_store_contents() {
        let temp = TempDir::new().unwrap();
        let db_path = temp.path().join("stations.db");
        let options = ImportOptions {
            geocode: false,
            ..ImportOptions::default()
        };
        import_stations_from_path(&db_path, Path::new(TEST_FIXTURE_PATH), None, &options).unwrap();

        let maps = Arc::new(FakeMaps::default());
        let state =
            AppState::load(&db_path, maps.clone(), maps, VehicleConfig::default()).unwrap();
        state.replace_catalog(StationCatalog::empty());
        let server = server(state.clone());

        let not_ready = server.get("/health/ready").await;
        assert_eq!(not_ready.status_code(), 503);
        let health: Value = not_ready.json();
        assert_eq!(health["status"], "not_ready");
        assert_eq!(health["stations_loaded"], 0);

        let response = server.post("/api/v1/catalog/reload").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["stations_loaded"], 6);
        assert_eq!(state.catalog().len(), 6);

        let ready = server.get("/health/ready").await;
        ready.assert_status_ok();
        let health: Value = ready.json();
        assert_eq!(health["stations_loaded"], 6);
    }

    #[tokio::test]
    async fn reload_without_store_is_unavailable() {
        let server = server(state_with(fixture_catalog()));
        let response = server.post("/api/v1/catalog/reload").await;
        assert_eq!(response.status_code(), 503);
        let problem: Value = response.json();
        assert_eq!(problem["type"], "/problems/service-unavailable");
    }

    #[tokio::test]
    async fn liveness_and_metrics_endpoints() {
        let server = server(state_with(StationCatalog::empty()));
        server.get("/health/live").await.assert_status_ok();
        let metrics = server.get("/metrics").await;
        metrics.assert_status_ok();
        assert!(metrics.text().contains('#') || metrics.text().is_empty());
    }
}
