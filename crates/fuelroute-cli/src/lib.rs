//! Fuel route CLI library.
//!
//! Terminal styling, output rendering, and default path resolution for the
//! `fuelroute` binary.

use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;

pub mod output;
pub mod terminal;

/// File name of the station database inside the data directory.
pub const DB_FILENAME: &str = "stations.db";

/// Default station database location in the platform data directory.
pub fn default_db_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("com", "fuelroute", "fuelroute")
        .context("could not determine a home directory for the station database")?;
    Ok(dirs.data_dir().join(DB_FILENAME))
}
