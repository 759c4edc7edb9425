use criterion::{criterion_group, criterion_main, Criterion};
use fuelroute_lib::{
    find_candidates, plan_fuel_stops, Coordinate, Route, Station, StationCatalog, VehicleConfig,
};
use once_cell::sync::Lazy;
use std::hint::black_box;

/// Houston to Seattle as a coarse polyline, densified to ~1 mile steps.
static ROUTE: Lazy<Route> = Lazy::new(|| {
    let waypoints = [
        (29.7604, -95.3698),
        (32.7767, -96.7970),
        (35.2220, -101.8313),
        (39.7392, -104.9903),
        (43.6150, -116.2023),
        (47.6062, -122.3321),
    ];
    let mut points = Vec::new();
    for pair in waypoints.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        for step in 0..400 {
            let t = step as f64 / 400.0;
            points.push(Coordinate {
                lat: a.0 + (b.0 - a.0) * t,
                lon: a.1 + (b.1 - a.1) * t,
            });
        }
    }
    points.push(Coordinate {
        lat: 47.6062,
        lon: -122.3321,
    });
    let length = points.windows(2).map(|p| p[0].distance_to(&p[1])).sum();
    Route::new(points, length).expect("valid route")
});

/// Roughly 8000 stations scattered over the continental US.
static CATALOG: Lazy<StationCatalog> = Lazy::new(|| {
    let mut seed: u64 = 7;
    let mut next = move || {
        seed = seed
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (seed >> 11) as f64 / (1u64 << 53) as f64
    };
    let stations = (0..8000).map(|id| Station {
        id,
        name: format!("Station {id}"),
        address: String::new(),
        city: String::new(),
        state: "TX".to_string(),
        rack_id: None,
        price: 2.5 + next() * 2.0,
        location: Coordinate {
            lat: 25.0 + next() * 24.0,
            lon: -124.0 + next() * 57.0,
        },
    });
    StationCatalog::from_stations(stations.collect::<Vec<_>>())
});

fn benchmark_planning(c: &mut Criterion) {
    let route = &*ROUTE;
    let catalog = &*CATALOG;
    let vehicle = VehicleConfig {
        corridor_miles: 25.0,
        ..VehicleConfig::default()
    };

    c.bench_function("corridor_houston_seattle", |b| {
        b.iter(|| black_box(find_candidates(route, catalog, vehicle.corridor_miles).len()));
    });

    c.bench_function("plan_houston_seattle", |b| {
        b.iter(|| match plan_fuel_stops(route, catalog, &vehicle) {
            Ok(plan) => black_box(plan.stops.len()),
            Err(_) => black_box(0),
        });
    });
}

criterion_group!(benches, benchmark_planning);
criterion_main!(benches);
