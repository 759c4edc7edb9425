//! Geocoding and directions collaborators.
//!
//! The planner never talks to the network; callers resolve locations and
//! routes through these traits first. [`MapQuestClient`] is the production
//! implementation and [`CachingProvider`] wraps any provider with a TTL cache.

mod cache;
mod mapquest;

pub use cache::{CachingProvider, TtlCache, DEFAULT_CACHE_TTL};
pub use mapquest::{
    parse_geocode_response, parse_route_response, MapQuestClient, MapQuestConfig,
    DEFAULT_MAPQUEST_URL, REQUEST_TIMEOUT,
};

use std::sync::Arc;

use crate::error::Result;
use crate::geo::Coordinate;
use crate::routing::Route;

/// Resolves free-text locations to coordinates.
pub trait Geocoder: Send + Sync {
    /// Fails with [`crate::Error::GeocodeFailure`] when nothing matches.
    fn geocode(&self, location: &str) -> Result<Coordinate>;
}

/// Computes a driving route between two coordinates.
pub trait DirectionsProvider: Send + Sync {
    /// Fails with [`crate::Error::RoutingFailure`] when no route exists.
    fn route(&self, origin: Coordinate, destination: Coordinate) -> Result<Route>;
}

impl<T: Geocoder + ?Sized> Geocoder for Arc<T> {
    fn geocode(&self, location: &str) -> Result<Coordinate> {
        (**self).geocode(location)
    }
}

impl<T: DirectionsProvider + ?Sized> DirectionsProvider for Arc<T> {
    fn route(&self, origin: Coordinate, destination: Coordinate) -> Result<Route> {
        (**self).route(origin, destination)
    }
}
