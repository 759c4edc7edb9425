//! SQLite station store.
//!
//! Stations are keyed by their OPIS truck-stop id. The store is written by
//! the import job and read wholesale into a [`StationCatalog`] snapshot.

use std::path::Path;

use rusqlite::{params, Connection, OpenFlags, OptionalExtension, Row};
use tracing::{debug, warn};

use crate::catalog::{Station, StationCatalog, StationId};
use crate::error::{Error, Result};
use crate::geo::Coordinate;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS stations (
    opis_id   INTEGER PRIMARY KEY,
    name      TEXT NOT NULL,
    address   TEXT NOT NULL,
    city      TEXT NOT NULL,
    state     TEXT NOT NULL,
    rack_id   INTEGER,
    price     REAL NOT NULL,
    latitude  REAL NOT NULL,
    longitude REAL NOT NULL
);
CREATE INDEX IF NOT EXISTS stations_state_idx ON stations(state);
CREATE INDEX IF NOT EXISTS stations_price_idx ON stations(price);
";

const SELECT_STATION: &str =
    "SELECT opis_id, name, address, city, state, rack_id, price, latitude, longitude FROM stations";

/// Open (creating if needed) a writable store and make sure the schema exists.
pub fn open_store(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let connection = Connection::open(path)?;
    ensure_schema(&connection)?;
    debug!(path = %path.display(), "opened station store");
    Ok(connection)
}

/// Open an existing store read-only.
pub fn open_store_read_only(path: &Path) -> Result<Connection> {
    if !path.exists() {
        return Err(Error::StoreNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?)
}

/// Create the stations table and its indexes when missing.
pub fn ensure_schema(connection: &Connection) -> Result<()> {
    connection.execute_batch(SCHEMA)?;
    Ok(())
}

/// Whether a station with `id` is already stored.
pub fn station_exists(connection: &Connection, id: StationId) -> Result<bool> {
    let mut stmt = connection.prepare_cached("SELECT 1 FROM stations WHERE opis_id = ?1 LIMIT 1")?;
    let mut rows = stmt.query([id])?;
    Ok(rows.next()?.is_some())
}

/// Insert a station. Fails if the id already exists.
pub fn insert_station(connection: &Connection, station: &Station) -> Result<()> {
    let mut stmt = connection.prepare_cached(
        "INSERT INTO stations (opis_id, name, address, city, state, rack_id, price, latitude, longitude)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    )?;
    stmt.execute(params![
        station.id,
        station.name,
        station.address,
        station.city,
        station.state,
        station.rack_id,
        station.price,
        station.location.lat,
        station.location.lon,
    ])?;
    Ok(())
}

/// All stored stations ordered by id. Rows with invalid coordinates are skipped.
pub fn load_stations(connection: &Connection) -> Result<Vec<Station>> {
    let sql = format!("{SELECT_STATION} ORDER BY opis_id");
    let mut stmt = connection.prepare(&sql)?;
    let rows = stmt.query_map([], row_to_station)?;

    let mut stations = Vec::new();
    for row in rows {
        let station = row?;
        if let Err(err) = station.location.validate() {
            warn!(
                id = station.id,
                error = %err,
                "skipping stored station with invalid coordinates"
            );
            continue;
        }
        stations.push(station);
    }
    Ok(stations)
}

/// Look up one station by id.
pub fn station_by_id(connection: &Connection, id: StationId) -> Result<Station> {
    let sql = format!("{SELECT_STATION} WHERE opis_id = ?1");
    connection
        .query_row(&sql, [id], row_to_station)
        .optional()?
        .ok_or(Error::StationNotFound { id })
}

/// Load the whole store into an immutable catalog snapshot.
///
/// A store without a stations table yields an empty catalog.
pub fn load_catalog(path: &Path) -> Result<StationCatalog> {
    let connection = open_store_read_only(path)?;
    if !table_exists(&connection, "stations")? {
        warn!(path = %path.display(), "station store has no stations table");
        return Ok(StationCatalog::empty());
    }

    let stations = load_stations(&connection)?;
    debug!(path = %path.display(), count = stations.len(), "loaded stations");
    Ok(StationCatalog::from_stations(stations))
}

fn row_to_station(row: &Row<'_>) -> rusqlite::Result<Station> {
    Ok(Station {
        id: row.get(0)?,
        name: row.get(1)?,
        address: row.get(2)?,
        city: row.get(3)?,
        state: row.get(4)?,
        rack_id: row.get(5)?,
        price: row.get(6)?,
        location: Coordinate {
            lat: row.get(7)?,
            lon: row.get(8)?,
        },
    })
}

fn table_exists(connection: &Connection, table: &str) -> Result<bool> {
    let mut stmt = connection
        .prepare("SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1 LIMIT 1")?;
    let mut rows = stmt.query([table])?;
    Ok(rows.next()?.is_some())
}
