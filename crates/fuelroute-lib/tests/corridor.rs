mod common;

use common::station;
use fuelroute_lib::error::Error;
use fuelroute_lib::geo::MILES_PER_DEGREE;
use fuelroute_lib::{
    find_candidates, plan_fuel_stops, Coordinate, Route, StationCatalog, VehicleConfig,
};

fn coord(lat: f64, lon: f64) -> Coordinate {
    Coordinate::new(lat, lon).expect("valid coordinate")
}

/// North along the -98 meridian for `degrees`, sampled every tenth of a degree.
fn meridian_route(degrees: u32) -> Route {
    let points: Vec<Coordinate> = (0..=degrees * 10)
        .map(|step| coord(30.0 + step as f64 / 10.0, -98.0))
        .collect();
    let length = degrees as f64 * MILES_PER_DEGREE;
    Route::new(points, length).expect("valid route")
}

#[test]
fn station_near_two_segments_appears_once_at_its_first_pass() {
    // Out to 38N and back on an almost identical line.
    let route = Route::new(
        vec![coord(37.0, -98.0), coord(38.0, -98.0), coord(37.0, -98.002)],
        2.0 * MILES_PER_DEGREE,
    )
    .unwrap();
    let catalog = StationCatalog::from_stations(vec![station(1, 37.5, -98.001, 3.0)]);

    let candidates = find_candidates(&route, &catalog, 2.0);
    assert_eq!(candidates.len(), 1);
    assert!((candidates[0].distance_along_route - MILES_PER_DEGREE / 2.0).abs() < 0.5);

    let vehicle = VehicleConfig {
        max_range_miles: 110.0,
        miles_per_gallon: 10.0,
        corridor_miles: 2.0,
    };
    let plan = plan_fuel_stops(&route, &catalog, &vehicle).unwrap();
    assert_eq!(plan.stops.len(), 1);
    assert_eq!(plan.stops[0].station.id, 1);
}

#[test]
fn plans_across_a_catalog_of_real_coordinates() {
    // 10 degrees north, roughly 691 miles.
    let route = meridian_route(10);
    let catalog = StationCatalog::from_stations(vec![
        station(1, 32.0, -98.0, 3.40),
        station(2, 34.5, -98.01, 2.90),
        station(3, 36.0, -98.0, 3.10),
        station(4, 36.0, -95.0, 1.00),
    ]);

    let plan = plan_fuel_stops(&route, &catalog, &VehicleConfig::default()).unwrap();
    let ids: Vec<i64> = plan.stops.iter().map(|s| s.station.id).collect();
    assert_eq!(ids, vec![2]);

    let stop = &plan.stops[0];
    assert!((stop.distance_from_start - 4.5 * MILES_PER_DEGREE).abs() < 0.5);
    let expected_miles = route.total_distance() - 500.0;
    assert!((stop.gallons - expected_miles / 10.0).abs() < 1e-9);
    assert!((plan.total_fuel_cost - stop.gallons * 2.90).abs() < 1e-9);
}

#[test]
fn off_corridor_stations_do_not_help() {
    let route = meridian_route(10);
    let catalog = StationCatalog::from_stations(vec![station(1, 35.0, -96.0, 2.50)]);

    let err = plan_fuel_stops(&route, &catalog, &VehicleConfig::default()).unwrap_err();
    assert!(matches!(err, Error::EmptyCatalog { .. }));
}

#[test]
fn corridor_width_is_respected() {
    let route = meridian_route(2);
    let lon_per_mile = 1.0 / (MILES_PER_DEGREE * 31.0_f64.to_radians().cos());
    let catalog = StationCatalog::from_stations(vec![
        station(1, 31.0, -98.0 + 1.5 * lon_per_mile, 3.0),
        station(2, 31.0, -98.0 + 4.0 * lon_per_mile, 3.0),
        station(3, 31.0, -98.0 - 6.0 * lon_per_mile, 3.0),
    ]);

    let ids = |miles: f64| -> Vec<i64> {
        find_candidates(&route, &catalog, miles)
            .iter()
            .map(|c| c.station.id)
            .collect()
    };
    assert_eq!(ids(1.0), Vec::<i64>::new());
    assert_eq!(ids(2.0), vec![1]);
    assert_eq!(ids(5.0), vec![1, 2]);
    assert_eq!(ids(10.0), vec![1, 2, 3]);
}
