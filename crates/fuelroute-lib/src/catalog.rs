//! In-memory fuel station catalog.
//!
//! A [`StationCatalog`] is an immutable snapshot: it is built once from the
//! station store and then shared read-only between planning calls. Besides the
//! station records it keeps a KD-tree over unit-sphere positions so corridor
//! searches only run the precise segment test on stations that are plausibly
//! close to the route.

use std::collections::HashMap;

use kiddo::float::kdtree::KdTree;
use kiddo::SquaredEuclidean;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::geo::Coordinate;

/// Numeric identifier for a station (the OPIS truck-stop id).
pub type StationId = i64;

/// KD-tree bucket size (kiddo default).
const BUCKET_SIZE: usize = 32;

/// Slack added to chord radii to absorb f32 rounding in the tree.
const CHORD_EPSILON: f64 = 1e-6;

/// A fuel station with its retail price and location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: StationId,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub rack_id: Option<i64>,
    /// Retail price in currency units per gallon.
    pub price: f64,
    pub location: Coordinate,
}

impl Station {
    /// Single-line address used for geocoding and display.
    pub fn full_address(&self) -> String {
        format_address(&self.address, &self.city, &self.state)
    }
}

/// Join the non-empty address parts with `", "`.
pub fn format_address(address: &str, city: &str, state: &str) -> String {
    [address, city, state]
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Aggregate figures describing a catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSummary {
    pub stations: usize,
    pub states: usize,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub mean_price: Option<f64>,
}

/// Immutable, spatially indexed set of stations.
pub struct StationCatalog {
    stations: Vec<Station>,
    id_to_index: HashMap<StationId, usize>,
    /// KD-tree items index into `sites`.
    tree: KdTree<f32, usize, 3, BUCKET_SIZE, u32>,
    /// Stations grouped by identical location. Geocoders often resolve many
    /// stations to the same city centroid; grouping keeps duplicate points out
    /// of the tree.
    sites: Vec<Vec<usize>>,
}

impl StationCatalog {
    /// Build a catalog from station records.
    ///
    /// Stations with invalid coordinates are dropped. When an id appears more
    /// than once the first record wins.
    pub fn from_stations(records: impl IntoIterator<Item = Station>) -> Self {
        let mut stations = Vec::new();
        let mut id_to_index = HashMap::new();
        let mut dropped = 0usize;

        for station in records {
            if station.location.validate().is_err() || !station.price.is_finite() {
                warn!(id = station.id, "dropping station with invalid location or price");
                dropped += 1;
                continue;
            }
            if id_to_index.contains_key(&station.id) {
                warn!(id = station.id, "dropping duplicate station id");
                dropped += 1;
                continue;
            }
            id_to_index.insert(station.id, stations.len());
            stations.push(station);
        }

        let mut site_by_position: HashMap<(u64, u64), usize> = HashMap::new();
        let mut sites: Vec<Vec<usize>> = Vec::new();
        let mut tree: KdTree<f32, usize, 3, BUCKET_SIZE, u32> = KdTree::new();

        for (index, station) in stations.iter().enumerate() {
            let key = (
                station.location.lat.to_bits(),
                station.location.lon.to_bits(),
            );
            if let Some(&site) = site_by_position.get(&key) {
                sites[site].push(index);
                continue;
            }
            let site = sites.len();
            site_by_position.insert(key, site);
            sites.push(vec![index]);

            let [x, y, z] = station.location.unit_vector();
            tree.add(&[x as f32, y as f32, z as f32], site);
        }

        info!(
            station_count = stations.len(),
            distinct_locations = sites.len(),
            dropped,
            "built station catalog"
        );

        Self {
            stations,
            id_to_index,
            tree,
            sites,
        }
    }

    /// An empty catalog.
    pub fn empty() -> Self {
        Self::from_stations(Vec::new())
    }

    /// Number of stations in the catalog.
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    /// Returns true if the catalog holds no stations.
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// All stations in load order.
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// Look up a station by id.
    pub fn get(&self, id: StationId) -> Option<&Station> {
        self.id_to_index.get(&id).map(|&idx| &self.stations[idx])
    }

    /// Station at a catalog index as returned by [`Self::indices_within_chord`].
    pub fn station(&self, index: usize) -> &Station {
        &self.stations[index]
    }

    /// Indices of stations whose unit-sphere position lies within `chord` of `point`.
    ///
    /// `point` does not need to lie on the sphere; corridor search queries
    /// from chord midpoints.
    pub fn indices_within_chord(&self, point: [f64; 3], chord: f64) -> Vec<usize> {
        if self.sites.is_empty() || chord < 0.0 {
            return Vec::new();
        }

        let query = [point[0] as f32, point[1] as f32, point[2] as f32];
        let radius = chord + CHORD_EPSILON;
        let squared_radius = (radius * radius) as f32;

        self.tree
            .within::<SquaredEuclidean>(&query, squared_radius)
            .into_iter()
            .flat_map(|neighbour| self.sites[neighbour.item].iter().copied())
            .collect()
    }

    /// Station counts and price statistics.
    pub fn summary(&self) -> CatalogSummary {
        let mut states: Vec<&str> = self.stations.iter().map(|s| s.state.as_str()).collect();
        states.sort_unstable();
        states.dedup();

        let prices = self.stations.iter().map(|s| s.price);
        let min_price = prices.clone().reduce(f64::min);
        let max_price = prices.clone().reduce(f64::max);
        let mean_price = if self.stations.is_empty() {
            None
        } else {
            Some(prices.sum::<f64>() / self.stations.len() as f64)
        };

        CatalogSummary {
            stations: self.stations.len(),
            states: states.len(),
            min_price,
            max_price,
            mean_price,
        }
    }
}

impl std::fmt::Debug for StationCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StationCatalog")
            .field("station_count", &self.stations.len())
            .field("distinct_locations", &self.sites.len())
            .finish()
    }
}
