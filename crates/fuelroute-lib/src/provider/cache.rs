use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::Result;
use crate::geo::Coordinate;
use crate::routing::Route;

use super::{DirectionsProvider, Geocoder};

/// Default lifetime for cached lookups (one day).
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Thread-safe map whose entries expire after a fixed time-to-live.
#[derive(Debug)]
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: Mutex<HashMap<K, (Instant, V)>>,
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Fresh value for `key`, if any.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.lock().unwrap_or_else(|p| p.into_inner());
        match entries.get(key) {
            Some((stored, value)) if stored.elapsed() < self.ttl => Some(value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, key: K, value: V) {
        let mut entries = self.entries.lock().unwrap_or_else(|p| p.into_inner());
        let ttl = self.ttl;
        entries.retain(|_, (stored, _)| stored.elapsed() < ttl);
        entries.insert(key, (Instant::now(), value));
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|p| p.into_inner()).len()
    }
}

type RouteKey = (u64, u64, u64, u64);

fn route_key(origin: Coordinate, destination: Coordinate) -> RouteKey {
    (
        origin.lat.to_bits(),
        origin.lon.to_bits(),
        destination.lat.to_bits(),
        destination.lon.to_bits(),
    )
}

/// Wraps a provider and memoizes successful geocode and route lookups.
///
/// Failures are never cached.
#[derive(Debug)]
pub struct CachingProvider<P> {
    inner: P,
    geocodes: TtlCache<String, Coordinate>,
    routes: TtlCache<RouteKey, Route>,
}

impl<P> CachingProvider<P> {
    pub fn new(inner: P, ttl: Duration) -> Self {
        Self {
            inner,
            geocodes: TtlCache::new(ttl),
            routes: TtlCache::new(ttl),
        }
    }

    pub fn with_default_ttl(inner: P) -> Self {
        Self::new(inner, DEFAULT_CACHE_TTL)
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P: Geocoder> Geocoder for CachingProvider<P> {
    fn geocode(&self, location: &str) -> Result<Coordinate> {
        let key = location.trim().to_lowercase();
        if let Some(found) = self.geocodes.get(&key) {
            debug!(location, "geocode cache hit");
            return Ok(found);
        }

        let found = self.inner.geocode(location)?;
        self.geocodes.insert(key, found);
        Ok(found)
    }
}

impl<P: DirectionsProvider> DirectionsProvider for CachingProvider<P> {
    fn route(&self, origin: Coordinate, destination: Coordinate) -> Result<Route> {
        let key = route_key(origin, destination);
        if let Some(route) = self.routes.get(&key) {
            debug!("route cache hit");
            return Ok(route);
        }

        let route = self.inner.route(origin, destination)?;
        self.routes.insert(key, route.clone());
        Ok(route)
    }
}
