//! Successful response bodies.
//!
//! Library results carry exact values; the views here round distances,
//! gallons and money to two decimals for presentation.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use fuelroute_lib::{round_currency, FuelStop, PlanResult, Route, Station};

/// Wrapper for successful responses with content type metadata.
///
/// This provides symmetry with `ProblemDetails` by including content type
/// information in the response body.
///
/// # Example
///
/// ```
/// use fuelroute_service::ServiceResponse;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Reloaded {
///     stations_loaded: usize,
/// }
///
/// let response = ServiceResponse::new(Reloaded { stations_loaded: 6 });
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceResponse<T> {
    /// The actual response payload.
    #[serde(flatten)]
    pub data: T,

    /// Content type for this response.
    pub content_type: String,
}

impl<T> ServiceResponse<T> {
    /// Create a new successful response with the default content type.
    pub fn new(data: T) -> Self {
        Self {
            data,
            content_type: "application/json".to_string(),
        }
    }
}

impl<T> From<T> for ServiceResponse<T> {
    fn from(data: T) -> Self {
        Self::new(data)
    }
}

impl<T: Serialize> IntoResponse for ServiceResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Station details as exposed over HTTP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationView {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rack_id: Option<i64>,
    /// Price per gallon, unrounded.
    pub price: f64,
    /// `[lat, lon]`.
    pub location: [f64; 2],
}

impl From<&Station> for StationView {
    fn from(station: &Station) -> Self {
        Self {
            id: station.id,
            name: station.name.clone(),
            address: station.address.clone(),
            city: station.city.clone(),
            state: station.state.clone(),
            rack_id: station.rack_id,
            price: station.price,
            location: station.location.as_pair(),
        }
    }
}

/// One fuel stop in a plan response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelStopView {
    #[serde(flatten)]
    pub station: StationView,
    pub distance_from_start: f64,
    pub gallons: f64,
    pub cost: f64,
}

impl From<&FuelStop> for FuelStopView {
    fn from(stop: &FuelStop) -> Self {
        Self {
            station: StationView::from(&stop.station),
            distance_from_start: round_currency(stop.distance_from_start),
            gallons: round_currency(stop.gallons),
            cost: round_currency(stop.cost),
        }
    }
}

/// Body of `POST /api/v1/optimize-route`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizeRouteResponse {
    /// Route polyline as `[lat, lon]` pairs.
    pub route: Vec<[f64; 2]>,
    pub total_distance: f64,
    pub fuel_stops: Vec<FuelStopView>,
    pub total_fuel_cost: f64,
    pub total_gallons: f64,
}

impl OptimizeRouteResponse {
    pub fn new(route: &Route, plan: &PlanResult) -> Self {
        Self {
            route: route.points().iter().map(|point| point.as_pair()).collect(),
            total_distance: round_currency(plan.total_distance),
            fuel_stops: plan.stops.iter().map(FuelStopView::from).collect(),
            total_fuel_cost: round_currency(plan.total_fuel_cost),
            total_gallons: round_currency(plan.total_gallons),
        }
    }
}

/// Body of `POST /api/v1/catalog/reload`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReloadResponse {
    pub stations_loaded: usize,
    /// RFC 3339 timestamp of the new snapshot.
    pub loaded_at: String,
}
