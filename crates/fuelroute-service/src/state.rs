//! Application state for the HTTP service.
//!
//! The station catalog is held as an immutable `Arc<StationCatalog>` snapshot.
//! Handlers clone the `Arc` once per request and plan against that; a reload
//! builds a complete new catalog and swaps the pointer, so in-flight requests
//! keep the snapshot they started with.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

use fuelroute_lib::{load_catalog, DirectionsProvider, Geocoder, StationCatalog, VehicleConfig};
use fuelroute_lib::Error as LibError;

/// Error during application state initialization or reload.
#[derive(Debug)]
pub enum AppStateError {
    /// Failed to load the station catalog.
    CatalogLoad(LibError),

    /// Database file not found.
    DatabaseNotFound(String),

    /// The state was built in memory and has no store to reload from.
    ReloadUnavailable,
}

impl std::fmt::Display for AppStateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CatalogLoad(e) => write!(f, "failed to load station catalog: {}", e),
            Self::DatabaseNotFound(path) => write!(f, "database not found: {}", path),
            Self::ReloadUnavailable => write!(f, "no station database configured for reload"),
        }
    }
}

impl std::error::Error for AppStateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::CatalogLoad(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LibError> for AppStateError {
    fn from(err: LibError) -> Self {
        Self::CatalogLoad(err)
    }
}

/// One catalog generation and when it was installed.
#[derive(Clone)]
struct Snapshot {
    catalog: Arc<StationCatalog>,
    loaded_at: DateTime<Utc>,
}

/// Shared application state for all axum handlers.
///
/// This struct is cheaply cloneable (using `Arc` internally) and should be
/// shared via axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    snapshot: RwLock<Snapshot>,
    db_path: Option<PathBuf>,
    geocoder: Arc<dyn Geocoder>,
    directions: Arc<dyn DirectionsProvider>,
    vehicle: VehicleConfig,
}

impl AppState {
    /// Load application state from a station database.
    pub fn load(
        db_path: impl AsRef<Path>,
        geocoder: Arc<dyn Geocoder>,
        directions: Arc<dyn DirectionsProvider>,
        vehicle: VehicleConfig,
    ) -> Result<Self, AppStateError> {
        let db_path = db_path.as_ref();

        if !db_path.exists() {
            return Err(AppStateError::DatabaseNotFound(
                db_path.display().to_string(),
            ));
        }

        tracing::info!(path = %db_path.display(), "loading station catalog");
        let catalog = load_catalog(db_path)?;
        tracing::info!(
            station_count = catalog.len(),
            "station catalog loaded successfully"
        );

        Ok(Self::build(
            catalog,
            Some(db_path.to_path_buf()),
            geocoder,
            directions,
            vehicle,
        ))
    }

    /// Create application state from pre-loaded components.
    ///
    /// This is useful for testing. The resulting state cannot be reloaded.
    pub fn from_components(
        catalog: StationCatalog,
        geocoder: Arc<dyn Geocoder>,
        directions: Arc<dyn DirectionsProvider>,
        vehicle: VehicleConfig,
    ) -> Self {
        Self::build(catalog, None, geocoder, directions, vehicle)
    }

    fn build(
        catalog: StationCatalog,
        db_path: Option<PathBuf>,
        geocoder: Arc<dyn Geocoder>,
        directions: Arc<dyn DirectionsProvider>,
        vehicle: VehicleConfig,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                snapshot: RwLock::new(Snapshot {
                    catalog: Arc::new(catalog),
                    loaded_at: Utc::now(),
                }),
                db_path,
                geocoder,
                directions,
                vehicle,
            }),
        }
    }

    fn snapshot(&self) -> Snapshot {
        self.inner
            .snapshot
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Current catalog snapshot.
    pub fn catalog(&self) -> Arc<StationCatalog> {
        self.snapshot().catalog
    }

    /// Station count and install time, read from a single snapshot.
    pub fn catalog_status(&self) -> (usize, DateTime<Utc>) {
        let snapshot = self.snapshot();
        (snapshot.catalog.len(), snapshot.loaded_at)
    }

    /// Install a new catalog snapshot.
    pub fn replace_catalog(&self, catalog: StationCatalog) -> DateTime<Utc> {
        let snapshot = Snapshot {
            catalog: Arc::new(catalog),
            loaded_at: Utc::now(),
        };
        let loaded_at = snapshot.loaded_at;
        *self
            .inner
            .snapshot
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = snapshot;
        loaded_at
    }

    /// Re-read the station database and swap in the result.
    ///
    /// Blocks on SQLite; call from a blocking context. Returns the new
    /// station count and the snapshot's install time.
    pub fn reload(&self) -> Result<(usize, DateTime<Utc>), AppStateError> {
        let db_path = self
            .inner
            .db_path
            .as_deref()
            .ok_or(AppStateError::ReloadUnavailable)?;

        let catalog = load_catalog(db_path)?;
        let count = catalog.len();
        let loaded_at = self.replace_catalog(catalog);
        tracing::info!(station_count = count, "station catalog reloaded");
        Ok((count, loaded_at))
    }

    /// Geocoder used to resolve request locations.
    pub fn geocoder(&self) -> Arc<dyn Geocoder> {
        Arc::clone(&self.inner.geocoder)
    }

    /// Directions provider used to build routes.
    pub fn directions(&self) -> Arc<dyn DirectionsProvider> {
        Arc::clone(&self.inner.directions)
    }

    /// Default vehicle parameters.
    pub fn vehicle(&self) -> VehicleConfig {
        self.inner.vehicle
    }

    /// Station database path, if the state was loaded from one.
    pub fn db_path(&self) -> Option<&Path> {
        self.inner.db_path.as_deref()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("station_count", &self.catalog().len())
            .field("db_path", &self.inner.db_path)
            .field("vehicle", &self.inner.vehicle)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{fixture_catalog, FakeMaps};

    fn state() -> AppState {
        let maps = Arc::new(FakeMaps::default());
        AppState::from_components(fixture_catalog(), maps.clone(), maps, VehicleConfig::default())
    }

    #[test]
    fn test_app_state_from_components() {
        let state = state();
        assert!(!state.catalog().is_empty());
        assert!(state.db_path().is_none());
        assert_eq!(state.vehicle(), VehicleConfig::default());
    }

    #[test]
    fn test_replace_catalog_keeps_old_snapshot_alive() {
        let state = state();
        let before = state.catalog();
        let count = before.len();

        state.replace_catalog(StationCatalog::empty());

        assert_eq!(before.len(), count);
        assert!(state.catalog().is_empty());
        assert!(state.catalog_status().1 >= Utc::now() - chrono::Duration::seconds(5));
    }

    #[test]
    fn test_clones_share_the_snapshot() {
        let state1 = state();
        let state2 = state1.clone();
        state1.replace_catalog(StationCatalog::empty());
        assert!(state2.catalog().is_empty());
    }

    #[test]
    fn test_reload_without_store_fails() {
        let err = state().reload().unwrap_err();
        assert!(matches!(err, AppStateError::ReloadUnavailable));
    }

    #[test]
    fn test_app_state_debug() {
        let debug = format!("{:?}", state());
        assert!(debug.contains("AppState"));
        assert!(debug.contains("station_count"));
    }

    #[test]
    fn test_app_state_load_nonexistent() {
        let maps = Arc::new(FakeMaps::default());
        let result = AppState::load(
            "/nonexistent/path/to/stations.db",
            maps.clone(),
            maps,
            VehicleConfig::default(),
        );

        match result.unwrap_err() {
            AppStateError::DatabaseNotFound(path) => {
                assert!(path.contains("nonexistent"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
