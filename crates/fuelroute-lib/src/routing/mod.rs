//! Route geometry and fuel-stop planning.
//!
//! This module provides:
//! - [`Route`] - a validated polyline with the router's total distance
//! - [`find_candidates`] - stations inside the corridor around a route
//! - [`plan_stops`] - the minimum-cost refueling policy over those candidates
//! - [`plan_fuel_stops`] - main entry point combining the two
//!
//! # Example
//!
//! ```ignore
//! use fuelroute_lib::{load_catalog, plan_fuel_stops, Coordinate, Route, VehicleConfig};
//!
//! let catalog = load_catalog("stations.db")?;
//! let route = Route::new(vec![origin, destination], 1021.4)?;
//! let plan = plan_fuel_stops(&route, &catalog, &VehicleConfig::default())?;
//! println!("{} stops, ${:.2}", plan.stops.len(), plan.total_fuel_cost);
//! ```

mod corridor;
mod planner;

pub use corridor::{find_candidates, Candidate};
pub use planner::plan_stops;

use serde::Serialize;
use tracing::debug;

use crate::catalog::StationCatalog;
use crate::config::VehicleConfig;
use crate::error::{Error, Result};
use crate::fuel::PlanResult;
use crate::geo::Coordinate;

/// A route point annotated with its distance from the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RoutePoint {
    pub coordinate: Coordinate,
    pub distance_from_start: f64,
}

/// Ordered polyline returned by a directions provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    points: Vec<Coordinate>,
    total_distance: f64,
}

impl Route {
    /// Build a route from at least two valid coordinates and a non-negative
    /// total distance in miles.
    pub fn new(points: Vec<Coordinate>, total_distance: f64) -> Result<Self> {
        if points.len() < 2 {
            return Err(Error::invalid(format!(
                "a route needs at least two points, got {}",
                points.len()
            )));
        }
        for point in &points {
            point.validate()?;
        }
        if !total_distance.is_finite() || total_distance < 0.0 {
            return Err(Error::invalid(format!(
                "total distance must be a non-negative number, got {total_distance}"
            )));
        }

        Ok(Self {
            points,
            total_distance,
        })
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    /// Distance reported by the directions provider, in miles.
    pub fn total_distance(&self) -> f64 {
        self.total_distance
    }

    /// Great-circle length of the polyline.
    pub fn polyline_length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| pair[0].distance_to(&pair[1]))
            .sum()
    }

    /// Points with cumulative distances.
    ///
    /// Haversine lengths are scaled so the last point sits at exactly
    /// [`Self::total_distance`]; the provider's road distance is authoritative.
    pub fn route_points(&self) -> Vec<RoutePoint> {
        let length = self.polyline_length();
        let scale = if length > 0.0 {
            self.total_distance / length
        } else {
            1.0
        };

        let mut cumulative = 0.0;
        let mut previous = self.points[0];
        let mut result = Vec::with_capacity(self.points.len());
        for (index, point) in self.points.iter().enumerate() {
            if index > 0 {
                cumulative += previous.distance_to(point) * scale;
            }
            previous = *point;
            result.push(RoutePoint {
                coordinate: *point,
                distance_from_start: cumulative,
            });
        }

        if length > 0.0 {
            if let Some(last) = result.last_mut() {
                last.distance_from_start = self.total_distance;
            }
        }
        result
    }
}

/// Plan the cheapest sequence of fuel stops for `route`.
///
/// Runs the corridor search against `catalog` and then the refueling policy.
/// Pure and synchronous; callers do any I/O beforehand.
pub fn plan_fuel_stops(
    route: &Route,
    catalog: &StationCatalog,
    vehicle: &VehicleConfig,
) -> Result<PlanResult> {
    vehicle.validate()?;

    let candidates = find_candidates(route, catalog, vehicle.corridor_miles);
    debug!(
        points = route.points().len(),
        total_distance = route.total_distance(),
        candidates = candidates.len(),
        "corridor search complete"
    );

    plan_stops(&candidates, route.total_distance(), vehicle)
}
