//! Common test utilities and fixture helpers.

use std::path::PathBuf;

use fuelroute_lib::{Candidate, Coordinate, Station, StationId};

/// Path to fixtures directory used by tests.
#[allow(dead_code)]
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

/// Path to the station CSV fixture.
#[allow(dead_code)]
pub fn stations_csv() -> PathBuf {
    fixtures_dir().join("stations.csv")
}

/// A station with a placeholder address.
pub fn station(id: StationId, lat: f64, lon: f64, price: f64) -> Station {
    Station {
        id,
        name: format!("Station {id}"),
        address: format!("Exit {id}"),
        city: "Testville".to_string(),
        state: "KS".to_string(),
        rack_id: None,
        price,
        location: Coordinate { lat, lon },
    }
}

/// Stations whose position along the route is given directly.
///
/// Ids follow input order so tests can refer to stations by index.
#[allow(dead_code)]
pub fn line_stations(stops: &[(f64, f64)]) -> Vec<(Station, f64)> {
    stops
        .iter()
        .enumerate()
        .map(|(index, &(position, price))| {
            (station(index as StationId, 38.0, -97.0, price), position)
        })
        .collect()
}

/// Borrow [`line_stations`] output as planner candidates.
#[allow(dead_code)]
pub fn candidates(stations: &[(Station, f64)]) -> Vec<Candidate<'_>> {
    stations
        .iter()
        .map(|(station, position)| Candidate {
            station,
            distance_along_route: *position,
        })
        .collect()
}

/// Small deterministic generator for synthetic instances.
#[allow(dead_code)]
pub struct Lcg(u64);

#[allow(dead_code)]
impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub fn next_u32(&mut self) -> u32 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (self.0 >> 33) as u32
    }

    /// Uniform integer in `low..=high`.
    pub fn range(&mut self, low: u32, high: u32) -> u32 {
        low + self.next_u32() % (high - low + 1)
    }
}
