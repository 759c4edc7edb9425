//! Fuel stops, plan results, and cost aggregation.

use serde::{Deserialize, Serialize};

use crate::catalog::Station;

/// A purchase at one station along the route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelStop {
    pub station: Station,
    /// Miles from the route origin to the station.
    pub distance_from_start: f64,
    pub gallons: f64,
    /// `gallons * station.price`, unrounded.
    pub cost: f64,
}

impl FuelStop {
    pub fn new(station: Station, distance_from_start: f64, gallons: f64) -> Self {
        let cost = gallons * station.price;
        Self {
            station,
            distance_from_start,
            gallons,
            cost,
        }
    }
}

/// Outcome of a planning call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanResult {
    /// Stops ordered by distance from the origin.
    pub stops: Vec<FuelStop>,
    pub total_distance: f64,
    pub total_gallons: f64,
    /// Exact sum of stop costs; see [`round_currency`] for display.
    pub total_fuel_cost: f64,
}

impl PlanResult {
    /// Build a result, deriving the totals from the stops.
    pub fn from_stops(stops: Vec<FuelStop>, total_distance: f64) -> Self {
        let total_gallons = stops.iter().map(|stop| stop.gallons).sum();
        let total_fuel_cost = total_fuel_cost(&stops);
        Self {
            stops,
            total_distance,
            total_gallons,
            total_fuel_cost,
        }
    }

    /// Whether the trip completes without buying fuel.
    pub fn is_direct(&self) -> bool {
        self.stops.is_empty()
    }
}

/// Sum of `gallons * price` over all stops.
pub fn total_fuel_cost(stops: &[FuelStop]) -> f64 {
    stops
        .iter()
        .map(|stop| stop.gallons * stop.station.price)
        .sum()
}

/// Round a currency or distance amount to two decimals.
pub fn round_currency(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
