//! Minimum-cost refueling along a line of stations.
//!
//! The vehicle starts with a full tank and may stop at any candidate. At each
//! stop it either buys just enough fuel to reach the nearest strictly cheaper
//! station in range, buys just enough to finish, or fills up and moves to the
//! cheapest station in range. Both lookups are precomputed or amortized so the
//! whole plan is a single forward pass.

use std::collections::VecDeque;

use tracing::debug;

use crate::config::VehicleConfig;
use crate::error::{Error, Result};
use crate::fuel::{FuelStop, PlanResult};

use super::Candidate;

/// Tolerance for distance comparisons and for ignoring empty purchases.
const EPSILON_MILES: f64 = 1e-9;

/// Choose fuel stops among `candidates` for a trip of `total_distance` miles.
///
/// Candidates at or beyond the destination are ignored. Fails with
/// [`Error::EmptyCatalog`] when refueling is needed and there are no usable
/// candidates, and with [`Error::UnreachableDestination`] when some gap along
/// the route is longer than one tank.
pub fn plan_stops(
    candidates: &[Candidate<'_>],
    total_distance: f64,
    vehicle: &VehicleConfig,
) -> Result<PlanResult> {
    vehicle.validate()?;
    if !total_distance.is_finite() || total_distance < 0.0 {
        return Err(Error::invalid(format!(
            "total distance must be a non-negative number, got {total_distance}"
        )));
    }

    let range = vehicle.max_range_miles;
    if total_distance <= range + EPSILON_MILES {
        return Ok(PlanResult::from_stops(Vec::new(), total_distance));
    }

    let mut usable: Vec<Candidate<'_>> = candidates
        .iter()
        .filter(|c| c.distance_along_route >= 0.0 && c.distance_along_route < total_distance)
        .copied()
        .collect();
    usable.sort_by(|a, b| a.distance_along_route.total_cmp(&b.distance_along_route));

    let Some(first) = usable.first() else {
        return Err(Error::EmptyCatalog {
            total_distance,
            max_range: range,
        });
    };
    if first.distance_along_route > range + EPSILON_MILES {
        return Err(Error::UnreachableDestination {
            position: 0.0,
            gap: first.distance_along_route,
            max_range: range,
        });
    }

    let positions: Vec<f64> = usable.iter().map(|c| c.distance_along_route).collect();
    let prices: Vec<f64> = usable.iter().map(|c| c.station.price).collect();
    let cheaper = next_cheaper(&prices);
    let mut window = CheapestWindow::default();

    let mut stops = Vec::new();
    let mut buy = |index: usize, miles: f64| {
        if miles > EPSILON_MILES {
            let candidate = &usable[index];
            stops.push(FuelStop::new(
                candidate.station.clone(),
                candidate.distance_along_route,
                vehicle.gallons_for(miles),
            ));
        }
    };

    let mut current = 0;
    let mut fuel = range - positions[0];

    loop {
        let here = positions[current];
        let reach = here + range + EPSILON_MILES;

        if let Some(next) = cheaper[current].filter(|&j| positions[j] <= reach) {
            let leg = positions[next] - here;
            let purchase = (leg - fuel).max(0.0);
            buy(current, purchase);
            fuel = (fuel + purchase - leg).max(0.0);
            current = next;
            continue;
        }

        let remaining = total_distance - here;
        if remaining <= range + EPSILON_MILES {
            buy(current, (remaining - fuel).max(0.0));
            break;
        }

        let Some(next) = window.cheapest_after(current, reach, &positions, &prices) else {
            let next_point = positions.get(current + 1).copied().unwrap_or(total_distance);
            return Err(Error::UnreachableDestination {
                position: here,
                gap: next_point - here,
                max_range: range,
            });
        };

        buy(current, (range - fuel).max(0.0));
        fuel = (range - (positions[next] - here)).max(0.0);
        current = next;
    }

    let plan = PlanResult::from_stops(stops, total_distance);
    debug!(
        stops = plan.stops.len(),
        gallons = plan.total_gallons,
        cost = plan.total_fuel_cost,
        "fuel plan computed"
    );
    Ok(plan)
}

/// For each index, the nearest later index with a strictly lower price.
fn next_cheaper(prices: &[f64]) -> Vec<Option<usize>> {
    let mut result = vec![None; prices.len()];
    let mut stack: Vec<usize> = Vec::new();

    for index in (0..prices.len()).rev() {
        while stack.last().is_some_and(|&top| prices[top] >= prices[index]) {
            stack.pop();
        }
        result[index] = stack.last().copied();
        stack.push(index);
    }
    result
}

/// Sliding minimum over the stations reachable from the current stop.
///
/// Both window edges only move forward because the current stop only moves
/// forward, so each index is pushed and popped at most once.
#[derive(Debug, Default)]
struct CheapestWindow {
    deque: VecDeque<usize>,
    next: usize,
}

impl CheapestWindow {
    /// Cheapest station with index > `current` and position <= `reach`.
    /// Ties resolve to the nearest station.
    fn cheapest_after(
        &mut self,
        current: usize,
        reach: f64,
        positions: &[f64],
        prices: &[f64],
    ) -> Option<usize> {
        self.next = self.next.max(current + 1);

        while self.next < positions.len() && positions[self.next] <= reach {
            let price = prices[self.next];
            while self.deque.back().is_some_and(|&back| prices[back] > price) {
                self.deque.pop_back();
            }
            self.deque.push_back(self.next);
            self.next += 1;
        }

        while self.deque.front().is_some_and(|&front| front <= current) {
            self.deque.pop_front();
        }
        self.deque.front().copied()
    }
}
