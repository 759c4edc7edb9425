//! Test utilities for handler testing.
//!
//! Provides the station fixture as an in-memory catalog and [`FakeMaps`], an
//! offline stand-in for the geocoding and directions provider that knows a
//! handful of places along I-40.

use std::collections::HashMap;
use std::fs::File;
use std::path::PathBuf;
use std::sync::OnceLock;

use fuelroute_lib::import::parse_station_csv;
use fuelroute_lib::{
    Coordinate, DirectionsProvider, Error, Geocoder, Result, Route, StationCatalog, VehicleConfig,
};

use crate::state::AppState;

/// Path to the station CSV fixture shared with the library tests.
pub const TEST_FIXTURE_PATH: &str =
    concat!(env!("CARGO_MANIFEST_DIR"), "/../../docs/fixtures/stations.csv");

static TEST_STATE: OnceLock<AppState> = OnceLock::new();

/// Place names [`FakeMaps`] can resolve.
pub mod fixture_places {
    pub const OKLAHOMA_CITY: &str = "Oklahoma City, OK";
    pub const AMARILLO: &str = "Amarillo, TX";
    pub const SANTA_ROSA: &str = "Santa Rosa, NM";
    pub const ALBUQUERQUE: &str = "Albuquerque, NM";
    pub const FLAGSTAFF: &str = "Flagstaff, AZ";
    pub const SEATTLE: &str = "Seattle, WA";
    pub const SALT_LAKE_CITY: &str = "Salt Lake City, UT";
    /// Geocodes, but no road route leads there.
    pub const HONOLULU: &str = "Honolulu, HI";
}

fn coordinate(lat: f64, lon: f64) -> Coordinate {
    Coordinate { lat, lon }
}

/// Offline geocoder and directions provider.
///
/// Routes between two stops of the I-40 corridor follow the corridor's
/// waypoints; any other pair gets a straight two-point route. Distances are
/// the polyline's great-circle length.
#[derive(Debug, Clone)]
pub struct FakeMaps {
    places: HashMap<String, Coordinate>,
    corridor: Vec<Coordinate>,
    unroutable: Vec<Coordinate>,
}

impl Default for FakeMaps {
    fn default() -> Self {
        use fixture_places::*;

        let okc = coordinate(35.4676, -97.5164);
        let amarillo = coordinate(35.1992, -101.8450);
        let santa_rosa = coordinate(35.0287, -104.6716);
        let albuquerque = coordinate(35.0844, -106.6504);
        let flagstaff = coordinate(35.1983, -111.6513);
        let honolulu = coordinate(21.3069, -157.8583);

        let places = [
            (OKLAHOMA_CITY, okc),
            (AMARILLO, amarillo),
            (SANTA_ROSA, santa_rosa),
            (ALBUQUERQUE, albuquerque),
            (FLAGSTAFF, flagstaff),
            (SEATTLE, coordinate(47.6062, -122.3321)),
            (SALT_LAKE_CITY, coordinate(40.7608, -111.8910)),
            (HONOLULU, honolulu),
        ]
        .into_iter()
        .map(|(name, at)| (name.to_lowercase(), at))
        .collect();

        Self {
            places,
            corridor: vec![okc, amarillo, santa_rosa, albuquerque, flagstaff],
            unroutable: vec![honolulu],
        }
    }
}

impl FakeMaps {
    fn polyline(&self, origin: Coordinate, destination: Coordinate) -> Vec<Coordinate> {
        let from = self.corridor.iter().position(|c| *c == origin);
        let to = self.corridor.iter().position(|c| *c == destination);
        match (from, to) {
            (Some(i), Some(j)) if i < j => self.corridor[i..=j].to_vec(),
            (Some(i), Some(j)) if i > j => self.corridor[j..=i].iter().rev().copied().collect(),
            _ => vec![origin, destination],
        }
    }
}

impl Geocoder for FakeMaps {
    fn geocode(&self, location: &str) -> Result<Coordinate> {
        self.places
            .get(&location.trim().to_lowercase())
            .copied()
            .ok_or_else(|| Error::GeocodeFailure {
                location: location.to_string(),
                message: "no matching location".to_string(),
            })
    }
}

impl DirectionsProvider for FakeMaps {
    fn route(&self, origin: Coordinate, destination: Coordinate) -> Result<Route> {
        if self.unroutable.contains(&origin) || self.unroutable.contains(&destination) {
            return Err(Error::RoutingFailure {
                message: "We are unable to route with the given locations.".to_string(),
            });
        }
        let points = self.polyline(origin, destination);
        let total: f64 = points.windows(2).map(|w| w[0].distance_to(&w[1])).sum();
        Route::new(points, total)
    }
}

/// Stations from the CSV fixture that carry coordinates.
///
/// # Panics
///
/// Panics if the fixture cannot be read.
pub fn fixture_catalog() -> StationCatalog {
    let path = PathBuf::from(TEST_FIXTURE_PATH);
    let file = File::open(&path)
        .unwrap_or_else(|e| panic!("failed to open fixture {:?}: {}", path, e));
    let rows = parse_station_csv(file)
        .unwrap_or_else(|e| panic!("failed to parse fixture {:?}: {}", path, e));

    StationCatalog::from_stations(rows.into_iter().filter_map(|row| {
        let record = row.record.ok()?;
        let location = record.location?;
        Some(record.into_station(location))
    }))
}

/// Shared state over the fixture catalog and [`FakeMaps`].
///
/// The state has no database path, so reloads report
/// [`crate::AppStateError::ReloadUnavailable`].
pub fn test_state() -> AppState {
    TEST_STATE
        .get_or_init(|| {
            let maps = std::sync::Arc::new(FakeMaps::default());
            AppState::from_components(
                fixture_catalog(),
                maps.clone(),
                maps,
                VehicleConfig::default(),
            )
        })
        .clone()
}

/// Generate a unique request ID for testing.
pub fn test_request_id() -> String {
    format!("test-{}", uuid::Uuid::now_v7())
}
