mod common;

use common::{candidates, line_stations, Lcg};
use fuelroute_lib::error::Error;
use fuelroute_lib::{plan_stops, total_fuel_cost, PlanResult, VehicleConfig};

fn vehicle(max_range: f64, miles_per_gallon: f64) -> VehicleConfig {
    VehicleConfig {
        max_range_miles: max_range,
        miles_per_gallon,
        corridor_miles: 5.0,
    }
}

fn stop_positions(plan: &PlanResult) -> Vec<f64> {
    plan.stops.iter().map(|s| s.distance_from_start).collect()
}

#[test]
fn short_trip_needs_no_stops_whatever_the_catalog() {
    let stations = line_stations(&[(10.0, 9.99), (200.0, 1.0)]);
    let plan = plan_stops(&candidates(&stations), 450.0, &vehicle(500.0, 10.0)).unwrap();
    assert!(plan.stops.is_empty());
    assert_eq!(plan.total_fuel_cost, 0.0);

    let plan = plan_stops(&[], 500.0, &vehicle(500.0, 10.0)).unwrap();
    assert!(plan.is_direct());
}

#[test]
fn long_trip_without_stations_is_an_empty_catalog() {
    let err = plan_stops(&[], 1000.0, &vehicle(500.0, 10.0)).unwrap_err();
    assert!(matches!(err, Error::EmptyCatalog { .. }));
}

#[test]
fn first_station_beyond_range_is_unreachable() {
    let stations = line_stations(&[(520.0, 3.0), (800.0, 3.0)]);
    let err = plan_stops(&candidates(&stations), 1000.0, &vehicle(500.0, 10.0)).unwrap_err();
    match err {
        Error::UnreachableDestination { position, gap, .. } => {
            assert_eq!(position, 0.0);
            assert_eq!(gap, 520.0);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn stations_near_the_start_cannot_bridge_a_long_gap() {
    // 480 and 490 both leave more than one tank to the destination.
    let stations = line_stations(&[(480.0, 3.00), (490.0, 4.50)]);
    let err = plan_stops(&candidates(&stations), 1000.0, &vehicle(500.0, 10.0)).unwrap_err();
    match err {
        Error::UnreachableDestination { position, gap, .. } => {
            assert_eq!(position, 490.0);
            assert_eq!(gap, 510.0);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn cheap_station_is_preferred_over_nearby_expensive_one() {
    let stations = line_stations(&[(480.0, 3.00), (490.0, 4.50), (900.0, 3.50)]);
    let plan = plan_stops(&candidates(&stations), 1000.0, &vehicle(500.0, 10.0)).unwrap();

    assert_eq!(stop_positions(&plan), vec![480.0, 900.0]);
    assert!((plan.stops[0].gallons - 48.0).abs() < 1e-9);
    assert!((plan.stops[1].gallons - 2.0).abs() < 1e-9);
    assert!((plan.total_fuel_cost - 151.0).abs() < 1e-9);
    assert!((plan.total_gallons - 50.0).abs() < 1e-9);
}

#[test]
fn skips_expensive_first_station_and_buys_only_what_is_needed() {
    let stations = line_stations(&[(100.0, 4.00), (300.0, 3.00), (600.0, 3.50)]);
    let plan = plan_stops(&candidates(&stations), 700.0, &vehicle(500.0, 10.0)).unwrap();

    // Arriving at mile 300 with 200 miles left in the tank, 200 more miles at
    // the cheapest price covers the rest of the trip.
    assert_eq!(stop_positions(&plan), vec![300.0]);
    assert!((plan.stops[0].gallons - 20.0).abs() < 1e-9);
    assert!((plan.total_fuel_cost - 60.0).abs() < 1e-9);
}

#[test]
fn buys_just_enough_to_reach_a_cheaper_station() {
    let stations = line_stations(&[(100.0, 4.00), (550.0, 3.00)]);
    let plan = plan_stops(&candidates(&stations), 1000.0, &vehicle(500.0, 10.0)).unwrap();

    assert_eq!(stop_positions(&plan), vec![100.0, 550.0]);
    // 400 miles left on arrival at 100; needs 450 to reach 550.
    assert!((plan.stops[0].gallons - 5.0).abs() < 1e-9);
    assert!((plan.stops[1].gallons - 45.0).abs() < 1e-9);
}

#[test]
fn ties_on_price_go_to_the_nearest_station() {
    let stations = line_stations(&[(50.0, 5.0), (200.0, 6.0), (300.0, 6.0)]);
    let plan = plan_stops(&candidates(&stations), 800.0, &vehicle(500.0, 10.0)).unwrap();
    assert_eq!(stop_positions(&plan), vec![50.0, 200.0, 300.0]);
}

#[test]
fn candidates_past_the_destination_are_ignored() {
    let stations = line_stations(&[(400.0, 3.0), (650.0, 1.0)]);
    let plan = plan_stops(&candidates(&stations), 600.0, &vehicle(500.0, 10.0)).unwrap();
    assert_eq!(stop_positions(&plan), vec![400.0]);
    assert!((plan.stops[0].gallons - 10.0).abs() < 1e-9);
}

#[test]
fn rejects_invalid_vehicle() {
    let err = plan_stops(&[], 100.0, &vehicle(-1.0, 10.0)).unwrap_err();
    assert!(matches!(err, Error::InvalidInput { .. }));
}

/// Reference optimum by dynamic programming over integer fuel levels.
///
/// Positions and range are integers and mpg is 1, so an optimal plan only
/// ever buys whole miles of fuel.
fn brute_force(stops: &[(f64, f64)], total: u32, range: u32) -> Option<f64> {
    let range = range as usize;
    let mut best = vec![f64::INFINITY; range + 1];
    best[range] = 0.0;
    let mut position = 0usize;

    for &(at, price) in stops {
        let gap = at as usize - position;
        position = at as usize;

        let mut arrived = vec![f64::INFINITY; range + 1];
        for fuel in gap..=range {
            arrived[fuel - gap] = best[fuel];
        }

        let mut refueled = arrived.clone();
        for fuel in 1..=range {
            refueled[fuel] = refueled[fuel].min(refueled[fuel - 1] + price);
        }
        best = refueled;
    }

    let gap = total as usize - position;
    if gap > range {
        return None;
    }
    let answer = best[gap..].iter().copied().fold(f64::INFINITY, f64::min);
    answer.is_finite().then_some(answer)
}

#[test]
fn greedy_matches_exhaustive_search_on_small_instances() {
    let mut rng = Lcg::new(0x5eed);
    let range = 100;

    for _ in 0..500 {
        let total = rng.range(101, 320);
        let count = rng.range(0, 6) as usize;
        let mut stops: Vec<(f64, f64)> = (0..count)
            .map(|_| {
                let position = rng.range(0, total - 1) as f64;
                let price = rng.range(200, 500) as f64 / 100.0;
                (position, price)
            })
            .collect();
        stops.sort_by(|a, b| a.0.total_cmp(&b.0));

        let stations = line_stations(&stops);
        let greedy = plan_stops(&candidates(&stations), total as f64, &vehicle(range as f64, 1.0));
        let expected = brute_force(&stops, total, range);

        match (greedy, expected) {
            (Ok(plan), Some(cost)) => assert!(
                (plan.total_fuel_cost - cost).abs() < 1e-6,
                "greedy {} vs optimum {cost} for {stops:?} over {total}",
                plan.total_fuel_cost
            ),
            (Err(_), None) => {}
            (greedy, expected) => {
                panic!("feasibility mismatch for {stops:?} over {total}: {greedy:?} vs {expected:?}")
            }
        }
    }
}

#[test]
fn every_leg_fits_in_one_tank_and_costs_add_up() {
    let mut rng = Lcg::new(42);

    for _ in 0..300 {
        let total = rng.range(501, 3000) as f64;
        let count = rng.range(1, 40) as usize;
        let mut stops: Vec<(f64, f64)> = (0..count)
            .map(|_| {
                let position = rng.range(0, total as u32 - 1) as f64;
                let price = rng.range(250, 450) as f64 / 100.0;
                (position, price)
            })
            .collect();
        stops.sort_by(|a, b| a.0.total_cmp(&b.0));

        let stations = line_stations(&stops);
        let Ok(plan) = plan_stops(&candidates(&stations), total, &vehicle(500.0, 7.5)) else {
            continue;
        };

        let mut previous = 0.0;
        for stop in &plan.stops {
            assert!(stop.distance_from_start - previous <= 500.0 + 1e-9);
            assert!(stop.gallons > 0.0);
            previous = stop.distance_from_start;
        }
        assert!(total - previous <= 500.0 + 1e-9);

        assert!(plan.total_fuel_cost >= 0.0);
        assert_eq!(plan.total_fuel_cost, total_fuel_cost(&plan.stops));
        let bought_miles = plan.total_gallons * 7.5;
        assert!((bought_miles - (total - 500.0)).abs() < 1e-6);
    }
}
