//! fuelroute library entry points.
//!
//! This crate holds everything needed to turn a driving route into a list of
//! fuel stops: the station catalog and its SQLite store, the CSV import job,
//! MapQuest geocoding and directions adapters, the corridor search, and the
//! minimum-cost refueling planner. The CLI and HTTP service only depend on
//! the items exported here.

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod fuel;
pub mod geo;
pub mod import;
pub mod provider;
pub mod routing;

pub use catalog::{CatalogSummary, Station, StationCatalog, StationId};
pub use config::VehicleConfig;
pub use db::{load_catalog, open_store, station_by_id};
pub use error::{Error, Result};
pub use fuel::{round_currency, total_fuel_cost, FuelStop, PlanResult};
pub use geo::Coordinate;
pub use import::{import_stations, import_stations_from_path, ImportOptions, ImportSummary};
pub use provider::{
    CachingProvider, DirectionsProvider, Geocoder, MapQuestClient, MapQuestConfig,
};
pub use routing::{find_candidates, plan_fuel_stops, plan_stops, Candidate, Route, RoutePoint};
