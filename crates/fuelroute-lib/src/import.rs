//! Station import from the OPIS truck-stop price CSV.
//!
//! Rows are parsed leniently: a malformed row is counted as failed and the
//! import moves on. Stations without coordinates are geocoded from their
//! address, retrying transport failures with exponential backoff.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io::Read;
use std::path::Path;
use std::thread;
use std::time::Duration;

use csv::{ReaderBuilder, StringRecord, Trim};
use rusqlite::Connection;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::catalog::{format_address, Station, StationId};
use crate::db::{insert_station, open_store, station_exists};
use crate::error::{Error, Result};
use crate::geo::Coordinate;
use crate::provider::Geocoder;

/// Canonical column name -> accepted header spellings (normalized).
const COLUMN_SYNONYMS: &[(&str, &[&str])] = &[
    ("id", &["opis_truckstop_id", "opistruckstopid", "opis_id", "truckstop_id", "id"]),
    ("name", &["truckstop_name", "truckstopname", "name", "station_name"]),
    ("address", &["address", "street", "street_address"]),
    ("city", &["city"]),
    ("state", &["state", "st"]),
    ("rack_id", &["rack_id", "rackid", "rack"]),
    ("price", &["retail_price", "retailprice", "price"]),
    ("latitude", &["latitude", "lat"]),
    ("longitude", &["longitude", "lon", "lng", "long"]),
];

const REQUIRED_COLUMNS: &[&str] = &["id", "name", "address", "city", "state", "price"];

/// How often progress is logged during an import.
const PROGRESS_INTERVAL: usize = 500;

/// One parsed CSV row. `location` is `None` when the file has no coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct StationRecord {
    pub id: StationId,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub rack_id: Option<i64>,
    pub price: f64,
    pub location: Option<Coordinate>,
}

impl StationRecord {
    pub fn full_address(&self) -> String {
        format_address(&self.address, &self.city, &self.state)
    }

    /// Attach a resolved location.
    pub fn into_station(self, location: Coordinate) -> Station {
        Station {
            id: self.id,
            name: self.name,
            address: self.address,
            city: self.city,
            state: self.state,
            rack_id: self.rack_id,
            price: self.price,
            location,
        }
    }
}

/// A data row and its CSV line number.
#[derive(Debug)]
pub struct ParsedRow {
    pub line: u64,
    pub record: Result<StationRecord>,
}

/// Tuning for an import run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImportOptions {
    /// Geocode rows that lack coordinates. When false such rows fail.
    pub geocode: bool,
    /// Total geocoding attempts per address.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles on every further retry.
    pub base_delay: Duration,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            geocode: true,
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

/// Counts reported at the end of an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub processed: usize,
    pub imported: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Parse every data row of a station CSV.
///
/// Fails up front only when the header row is unreadable or lacks a required
/// column; per-row problems are returned in [`ParsedRow::record`].
pub fn parse_station_csv<R: Read>(reader: R) -> Result<Vec<ParsedRow>> {
    let mut csv_reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|err| Error::CatalogImport {
            message: format!("failed to read CSV headers: {err}"),
        })?
        .clone();
    let columns = map_columns(&headers)?;

    let mut rows = Vec::new();
    for (offset, result) in csv_reader.records().enumerate() {
        // Header is line 1.
        let line = offset as u64 + 2;
        let record = result
            .map_err(Error::from)
            .and_then(|record| parse_record(&columns, &record));
        rows.push(ParsedRow { line, record });
    }
    Ok(rows)
}

fn normalize_header(header: &str) -> String {
    header
        .trim()
        .to_ascii_lowercase()
        .chars()
        .map(|c| if c.is_ascii_whitespace() || c == '-' { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

fn map_columns(headers: &StringRecord) -> Result<BTreeMap<&'static str, usize>> {
    let normalized: Vec<String> = headers.iter().map(normalize_header).collect();

    let mut columns = BTreeMap::new();
    for (canonical, spellings) in COLUMN_SYNONYMS {
        if let Some(index) = spellings
            .iter()
            .find_map(|spelling| normalized.iter().position(|h| h == spelling))
        {
            columns.insert(*canonical, index);
        }
    }

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|column| !columns.contains_key(column))
        .collect();
    if !missing.is_empty() {
        return Err(Error::CatalogImport {
            message: format!(
                "station CSV missing required columns: {}. Available: {}",
                missing.join(", "),
                headers.iter().collect::<Vec<_>>().join(", ")
            ),
        });
    }

    Ok(columns)
}

fn parse_record(
    columns: &BTreeMap<&'static str, usize>,
    record: &StringRecord,
) -> Result<StationRecord> {
    let get = |name: &str| field(columns, record, name);
    let row_error = |message: String| Error::CatalogImport { message };

    let raw_id = get("id");
    let id: StationId = raw_id
        .parse()
        .map_err(|_| row_error(format!("invalid station id '{raw_id}'")))?;

    let name = get("name").to_string();
    if name.is_empty() {
        return Err(row_error(format!("station {id} has no name")));
    }

    let state = get("state").to_ascii_uppercase();
    if state.len() != 2 || !state.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(row_error(format!("station {id} has invalid state '{state}'")));
    }

    let raw_price = get("price");
    let price: f64 = raw_price
        .trim_start_matches('$')
        .parse()
        .ok()
        .filter(|price: &f64| price.is_finite() && *price >= 0.0)
        .ok_or_else(|| row_error(format!("station {id} has invalid price '{raw_price}'")))?;

    let raw_rack = get("rack_id");
    let rack_id = if raw_rack.is_empty() {
        None
    } else {
        Some(
            raw_rack
                .parse::<i64>()
                .map_err(|_| row_error(format!("station {id} has invalid rack id '{raw_rack}'")))?,
        )
    };

    let location = match (get("latitude"), get("longitude")) {
        ("", _) | (_, "") => None,
        (lat, lon) => {
            let lat: f64 = lat
                .parse()
                .map_err(|_| row_error(format!("station {id} has invalid latitude '{lat}'")))?;
            let lon: f64 = lon
                .parse()
                .map_err(|_| row_error(format!("station {id} has invalid longitude '{lon}'")))?;
            Some(Coordinate::new(lat, lon)?)
        }
    };

    Ok(StationRecord {
        id,
        name,
        address: get("address").to_string(),
        city: get("city").to_string(),
        state,
        rack_id,
        price,
        location,
    })
}

fn field<'r>(
    columns: &BTreeMap<&'static str, usize>,
    record: &'r StringRecord,
    name: &str,
) -> &'r str {
    columns
        .get(name)
        .and_then(|&index| record.get(index))
        .unwrap_or("")
}

/// Delay before retry number `attempt + 1`: `base * 2^attempt`.
pub fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt))
}

/// Geocode `address`, retrying transport failures.
///
/// A definitive "not found" answer is returned immediately.
pub fn geocode_with_retry(
    geocoder: &dyn Geocoder,
    address: &str,
    options: &ImportOptions,
) -> Result<Coordinate> {
    let attempts = options.max_attempts.max(1);
    let mut attempt = 0;
    loop {
        match geocoder.geocode(address) {
            Ok(found) => return Ok(found),
            Err(err) if err.is_transient() && attempt + 1 < attempts => {
                let delay = backoff_delay(options.base_delay, attempt);
                warn!(
                    address,
                    attempt = attempt + 1,
                    error = %err,
                    ?delay,
                    "geocoding failed, retrying"
                );
                thread::sleep(delay);
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Import stations from a CSV reader into an open store.
///
/// Runs in one transaction. Stations whose id is already stored, or that
/// appeared earlier in the same file, are skipped.
pub fn import_stations<R: Read>(
    connection: &mut Connection,
    reader: R,
    geocoder: Option<&dyn Geocoder>,
    options: &ImportOptions,
) -> Result<ImportSummary> {
    let rows = parse_station_csv(reader)?;
    let transaction = connection.transaction()?;

    let mut summary = ImportSummary::default();
    let mut seen: HashSet<StationId> = HashSet::new();

    for row in rows {
        summary.processed += 1;
        if summary.processed % PROGRESS_INTERVAL == 0 {
            info!(
                processed = summary.processed,
                imported = summary.imported,
                "import progress"
            );
        }

        let record = match row.record {
            Ok(record) => record,
            Err(err) => {
                warn!(line = row.line, error = %err, "skipping malformed row");
                summary.failed += 1;
                continue;
            }
        };

        if !seen.insert(record.id) || station_exists(&transaction, record.id)? {
            debug!(id = record.id, "station already imported");
            summary.skipped += 1;
            continue;
        }

        let location = match (record.location, geocoder) {
            (Some(location), _) => location,
            (None, Some(geocoder)) if options.geocode => {
                match geocode_with_retry(geocoder, &record.full_address(), options) {
                    Ok(location) => location,
                    Err(err) => {
                        warn!(
                            id = record.id,
                            line = row.line,
                            error = %err,
                            "could not geocode station"
                        );
                        summary.failed += 1;
                        continue;
                    }
                }
            }
            (None, _) => {
                warn!(
                    id = record.id,
                    line = row.line,
                    "station has no coordinates and geocoding is disabled"
                );
                summary.failed += 1;
                continue;
            }
        };

        insert_station(&transaction, &record.into_station(location))?;
        summary.imported += 1;
    }

    transaction.commit()?;
    info!(
        processed = summary.processed,
        imported = summary.imported,
        skipped = summary.skipped,
        failed = summary.failed,
        "station import finished"
    );
    Ok(summary)
}

/// Import a CSV file into the store at `db_path`, creating it if needed.
pub fn import_stations_from_path(
    db_path: &Path,
    csv_path: &Path,
    geocoder: Option<&dyn Geocoder>,
    options: &ImportOptions,
) -> Result<ImportSummary> {
    let file = fs::File::open(csv_path)?;
    let mut connection = open_store(db_path)?;
    info!(csv = %csv_path.display(), db = %db_path.display(), "importing stations");
    import_stations(&mut connection, file, geocoder, options)
}
