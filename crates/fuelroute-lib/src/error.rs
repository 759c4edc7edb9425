use std::path::PathBuf;

use thiserror::Error;

use crate::catalog::StationId;

/// Convenient result alias for the fuelroute library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when coordinates, routes, or vehicle parameters are malformed.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// Raised when a gap along the route is longer than one tank of fuel.
    #[error(
        "destination unreachable: gap of {gap:.1} miles after mile {position:.1} exceeds the {max_range:.1} mile range"
    )]
    UnreachableDestination {
        position: f64,
        gap: f64,
        max_range: f64,
    },

    /// Raised when refueling is required but no station lies along the route.
    #[error(
        "no fuel stations along the route; a {total_distance:.1} mile trip needs refueling beyond the {max_range:.1} mile range"
    )]
    EmptyCatalog { total_distance: f64, max_range: f64 },

    /// Raised when the geocoder could not resolve a location.
    #[error("could not geocode location '{location}': {message}")]
    GeocodeFailure { location: String, message: String },

    /// Raised when the directions provider could not produce a route.
    #[error("no route found: {message}")]
    RoutingFailure { message: String },

    /// Raised when a station identifier is not present in the catalog.
    #[error("unknown station id {id}")]
    StationNotFound { id: StationId },

    /// Raised when the station CSV cannot be used for an import.
    #[error("station import failed: {message}")]
    CatalogImport { message: String },

    /// Raised when the station database file does not exist.
    #[error("station database not found at {path}")]
    StoreNotFound { path: PathBuf },

    /// Wrapper for SQLite errors.
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for HTTP client errors.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Wrapper for CSV parsing errors.
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl Error {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Error::InvalidInput {
            message: message.into(),
        }
    }

    /// Whether a retry with the same input could plausibly succeed.
    ///
    /// Only transport failures qualify; everything else is a deterministic
    /// function of the input.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Http(_) | Error::Io(_))
    }
}
