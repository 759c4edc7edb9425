//! RFC 9457 Problem Details for HTTP APIs.
//!
//! Provides structured error responses following the Problem Details standard.
//! Every library error kind maps to its own problem type so clients can tell
//! "address not found" apart from "no route possible" and from "this vehicle
//! cannot make the trip".
//! See: <https://www.rfc-editor.org/rfc/rfc9457.html>

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use fuelroute_lib::Error as LibError;

/// Problem type URI for invalid request parameters.
pub const PROBLEM_INVALID_REQUEST: &str = "/problems/invalid-request";

/// Problem type URI for locations the geocoder could not resolve.
pub const PROBLEM_LOCATION_NOT_FOUND: &str = "/problems/location-not-found";

/// Problem type URI for routes the directions provider could not build.
pub const PROBLEM_ROUTE_NOT_FOUND: &str = "/problems/route-not-found";

/// Problem type URI for unknown station ids.
pub const PROBLEM_UNKNOWN_STATION: &str = "/problems/unknown-station";

/// Problem type URI for trips with a gap longer than the vehicle range.
pub const PROBLEM_DESTINATION_UNREACHABLE: &str = "/problems/destination-unreachable";

/// Problem type URI for trips that need fuel but pass no stations.
pub const PROBLEM_NO_FUEL_STATIONS: &str = "/problems/no-fuel-stations";

/// Problem type URI for failures talking to the mapping provider.
pub const PROBLEM_UPSTREAM_UNAVAILABLE: &str = "/problems/upstream-unavailable";

/// Problem type URI for internal server errors.
pub const PROBLEM_INTERNAL_ERROR: &str = "/problems/internal-error";

/// Problem type URI for service unavailable (e.g., missing station store).
pub const PROBLEM_SERVICE_UNAVAILABLE: &str = "/problems/service-unavailable";

/// RFC 9457 Problem Details response structure.
///
/// # Example
///
/// ```
/// use fuelroute_service::{ProblemDetails, PROBLEM_LOCATION_NOT_FOUND};
/// use axum::http::StatusCode;
///
/// let problem = ProblemDetails::new(
///     PROBLEM_LOCATION_NOT_FOUND,
///     "Location Not Found",
///     StatusCode::NOT_FOUND,
/// )
/// .with_detail("Could not geocode 'Atlantis'")
/// .with_request_id("req-12345");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetails {
    /// URI reference identifying the problem type (relative).
    #[serde(rename = "type")]
    pub type_uri: String,

    /// Short, human-readable summary of the problem.
    pub title: String,

    /// HTTP status code for this problem.
    pub status: u16,

    /// Human-readable explanation specific to this occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// URI reference identifying the specific occurrence (e.g., request ID).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,

    /// Content type for this response (always "application/problem+json").
    pub content_type: String,
}

impl ProblemDetails {
    /// Create a new ProblemDetails with required fields.
    pub fn new(type_uri: impl Into<String>, title: impl Into<String>, status: StatusCode) -> Self {
        Self {
            type_uri: type_uri.into(),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
            instance: None,
            content_type: "application/problem+json".to_string(),
        }
    }

    /// Add a detailed explanation of this specific problem occurrence.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Add the request identifier for tracing.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.instance = Some(request_id.into());
        self
    }

    fn build(
        type_uri: &str,
        title: &str,
        status: StatusCode,
        detail: impl Into<String>,
        request_id: impl Into<String>,
    ) -> Self {
        Self::new(type_uri, title, status)
            .with_detail(detail)
            .with_request_id(request_id)
    }

    /// Create a 400 Bad Request problem for invalid input.
    pub fn bad_request(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::build(
            PROBLEM_INVALID_REQUEST,
            "Invalid Request",
            StatusCode::BAD_REQUEST,
            detail,
            request_id,
        )
    }

    /// Create a 404 Not Found problem for an unresolvable location.
    pub fn location_not_found(location: &str, request_id: impl Into<String>) -> Self {
        Self::build(
            PROBLEM_LOCATION_NOT_FOUND,
            "Location Not Found",
            StatusCode::NOT_FOUND,
            format!("Could not find a location matching '{location}'"),
            request_id,
        )
    }

    /// Create a 404 Not Found problem when no route exists.
    pub fn route_not_found(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::build(
            PROBLEM_ROUTE_NOT_FOUND,
            "Route Not Found",
            StatusCode::NOT_FOUND,
            detail,
            request_id,
        )
    }

    /// Create a 404 Not Found problem for an unknown station id.
    pub fn unknown_station(id: i64, request_id: impl Into<String>) -> Self {
        Self::build(
            PROBLEM_UNKNOWN_STATION,
            "Unknown Station",
            StatusCode::NOT_FOUND,
            format!("Station {id} not found"),
            request_id,
        )
    }

    /// Create a 422 problem for a trip with a gap longer than one tank.
    pub fn destination_unreachable(
        detail: impl Into<String>,
        request_id: impl Into<String>,
    ) -> Self {
        Self::build(
            PROBLEM_DESTINATION_UNREACHABLE,
            "Destination Unreachable",
            StatusCode::UNPROCESSABLE_ENTITY,
            detail,
            request_id,
        )
    }

    /// Create a 422 problem for a trip with no fuel stations along it.
    pub fn no_fuel_stations(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::build(
            PROBLEM_NO_FUEL_STATIONS,
            "No Fuel Stations",
            StatusCode::UNPROCESSABLE_ENTITY,
            detail,
            request_id,
        )
    }

    /// Create a 502 Bad Gateway problem for mapping provider failures.
    pub fn upstream_unavailable(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::build(
            PROBLEM_UPSTREAM_UNAVAILABLE,
            "Upstream Unavailable",
            StatusCode::BAD_GATEWAY,
            detail,
            request_id,
        )
    }

    /// Create a 500 Internal Server Error problem.
    pub fn internal_error(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::build(
            PROBLEM_INTERNAL_ERROR,
            "Internal Error",
            StatusCode::INTERNAL_SERVER_ERROR,
            detail,
            request_id,
        )
    }

    /// Create a 503 Service Unavailable problem.
    pub fn service_unavailable(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::build(
            PROBLEM_SERVICE_UNAVAILABLE,
            "Service Unavailable",
            StatusCode::SERVICE_UNAVAILABLE,
            detail,
            request_id,
        )
    }
}

impl std::fmt::Display for ProblemDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}",
            self.title,
            self.detail.as_deref().unwrap_or("")
        )
    }
}

impl std::error::Error for ProblemDetails {}

impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut response = Json(&self).into_response();
        response.headers_mut().insert(
            axum::http::header::CONTENT_TYPE,
            axum::http::HeaderValue::from_static("application/problem+json"),
        );

        *response.status_mut() = status;
        response
    }
}

/// Convert library errors to ProblemDetails.
///
/// The `request_id` must be provided separately since library errors don't have it.
pub fn from_lib_error(error: &LibError, request_id: &str) -> ProblemDetails {
    match error {
        LibError::InvalidInput { message } => ProblemDetails::bad_request(message, request_id),
        LibError::GeocodeFailure { location, .. } => {
            ProblemDetails::location_not_found(location, request_id)
        }
        LibError::RoutingFailure { message } => {
            ProblemDetails::route_not_found(message, request_id)
        }
        LibError::StationNotFound { id } => ProblemDetails::unknown_station(*id, request_id),
        LibError::UnreachableDestination { .. } => {
            ProblemDetails::destination_unreachable(error.to_string(), request_id)
        }
        LibError::EmptyCatalog { .. } => {
            ProblemDetails::no_fuel_stations(error.to_string(), request_id)
        }
        LibError::Http(_) => ProblemDetails::upstream_unavailable(
            "The mapping provider could not be reached",
            request_id,
        ),
        LibError::StoreNotFound { path } => ProblemDetails::service_unavailable(
            format!("Station database not available at {}", path.display()),
            request_id,
        ),
        _ => ProblemDetails::internal_error(error.to_string(), request_id),
    }
}
