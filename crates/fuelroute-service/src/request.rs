//! Request types and validation for HTTP endpoints.

use serde::{Deserialize, Serialize};

use fuelroute_lib::VehicleConfig;

use crate::ProblemDetails;

/// Longest accepted location string.
const MAX_LOCATION_LEN: usize = 200;

/// Upper bound on per-request range overrides, in miles.
const MAX_RANGE_LIMIT: f64 = 5000.0;

/// Upper bound on per-request fuel economy overrides.
const MAX_MPG_LIMIT: f64 = 200.0;

/// Validation trait for request types.
///
/// Implementations should validate all fields and return a `ProblemDetails`
/// error for invalid input.
pub trait Validate {
    /// Validate the request, returning an error if invalid.
    ///
    /// The `request_id` is used to populate the `instance` field of any
    /// returned `ProblemDetails`.
    ///
    /// Returns a boxed `ProblemDetails` to avoid large `Result::Err` variants.
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>>;
}

/// Request for the cheapest fuel plan between two free-text locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeRouteRequest {
    /// Starting location, e.g. "Houston, TX".
    #[serde(alias = "from")]
    pub start: String,

    /// Destination location.
    #[serde(alias = "to")]
    pub end: String,

    /// Override for the vehicle range in miles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_range: Option<f64>,

    /// Override for the vehicle fuel economy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub miles_per_gallon: Option<f64>,
}

impl OptimizeRouteRequest {
    /// Service defaults with this request's overrides applied.
    pub fn vehicle(&self, defaults: &VehicleConfig) -> VehicleConfig {
        defaults.with_overrides(self.max_range, self.miles_per_gallon)
    }
}

fn check_location(field: &str, value: &str, request_id: &str) -> Result<(), Box<ProblemDetails>> {
    if value.trim().is_empty() {
        return Err(Box::new(ProblemDetails::bad_request(
            format!("The '{field}' field is required and cannot be empty"),
            request_id,
        )));
    }
    if value.len() > MAX_LOCATION_LEN {
        return Err(Box::new(ProblemDetails::bad_request(
            format!("The '{field}' field must not exceed {MAX_LOCATION_LEN} characters"),
            request_id,
        )));
    }
    Ok(())
}

fn check_positive(
    field: &str,
    value: Option<f64>,
    limit: f64,
    request_id: &str,
) -> Result<(), Box<ProblemDetails>> {
    if let Some(value) = value {
        if !value.is_finite() || value <= 0.0 {
            return Err(Box::new(ProblemDetails::bad_request(
                format!("The '{field}' field must be a positive number"),
                request_id,
            )));
        }
        if value > limit {
            return Err(Box::new(ProblemDetails::bad_request(
                format!("The '{field}' field must not exceed {limit}"),
                request_id,
            )));
        }
    }
    Ok(())
}

impl Validate for OptimizeRouteRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        check_location("start", &self.start, request_id)?;
        check_location("end", &self.end, request_id)?;
        check_positive("max_range", self.max_range, MAX_RANGE_LIMIT, request_id)?;
        check_positive(
            "miles_per_gallon",
            self.miles_per_gallon,
            MAX_MPG_LIMIT,
            request_id,
        )?;
        Ok(())
    }
}
