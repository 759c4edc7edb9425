use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use fuelroute_cli::default_db_path;
use fuelroute_cli::output::{render_import, render_plan, render_station, render_summary, PlanReport};
use fuelroute_cli::terminal::ColorPalette;
use fuelroute_lib::db::open_store_read_only;
use fuelroute_lib::{
    import_stations_from_path, load_catalog, plan_fuel_stops, station_by_id, CachingProvider,
    DirectionsProvider, Geocoder, ImportOptions, MapQuestClient, MapQuestConfig, StationId,
    VehicleConfig,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Fuel station import and fuel-stop planning")]
struct Cli {
    /// Station database path (defaults to the platform data directory).
    #[arg(long, global = true, env = "FUELROUTE_DB_PATH")]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import stations from a CSV price file into the database.
    Import {
        /// CSV file to import.
        csv: PathBuf,
        /// Skip rows without coordinates instead of geocoding their address.
        #[arg(long)]
        no_geocode: bool,
        /// Geocoding attempts per row for transient failures.
        #[arg(long, default_value_t = 3)]
        max_attempts: u32,
    },
    /// Plan the cheapest fuel stops between two locations.
    Plan {
        /// Starting location, e.g. "Houston, TX".
        #[arg(long = "from")]
        from: String,
        /// Destination location.
        #[arg(long = "to")]
        to: String,
        /// Override the vehicle range in miles.
        #[arg(long)]
        max_range: Option<f64>,
        /// Override the fuel economy in miles per gallon.
        #[arg(long)]
        mpg: Option<f64>,
        /// Print the plan as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Show one station by its id.
    Station {
        id: StationId,
        /// Print the station as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Summarize the station catalog.
    Stations {
        /// Print the summary as JSON.
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let db_path = match cli.db {
        Some(path) => path,
        None => default_db_path()?,
    };

    match cli.command {
        Command::Import {
            csv,
            no_geocode,
            max_attempts,
        } => handle_import(&db_path, &csv, no_geocode, max_attempts),
        Command::Plan {
            from,
            to,
            max_range,
            mpg,
            json,
        } => handle_plan(&db_path, &from, &to, max_range, mpg, json),
        Command::Station { id, json } => handle_station(&db_path, id, json),
        Command::Stations { json } => handle_stations(&db_path, json),
    }
}

fn mapquest() -> Result<MapQuestClient> {
    let config = MapQuestConfig::from_env().context("MapQuest is not configured")?;
    MapQuestClient::new(config).context("failed to build the MapQuest client")
}

fn handle_import(db_path: &Path, csv: &Path, no_geocode: bool, max_attempts: u32) -> Result<()> {
    let options = ImportOptions {
        geocode: !no_geocode,
        max_attempts: max_attempts.max(1),
        ..ImportOptions::default()
    };

    let geocoder = if no_geocode {
        None
    } else {
        let client = mapquest()
            .context("geocoding needs MAPQUEST_API_KEY; pass --no-geocode to skip it")?;
        Some(CachingProvider::with_default_ttl(client))
    };

    let summary = import_stations_from_path(
        db_path,
        csv,
        geocoder.as_ref().map(|g| g as &dyn Geocoder),
        &options,
    )
    .with_context(|| format!("failed to import {} into {}", csv.display(), db_path.display()))?;

    print!("{}", render_import(&summary));
    println!("Database: {}", db_path.display());
    Ok(())
}

fn handle_plan(
    db_path: &Path,
    from: &str,
    to: &str,
    max_range: Option<f64>,
    mpg: Option<f64>,
    json: bool,
) -> Result<()> {
    let catalog = load_catalog(db_path)
        .with_context(|| format!("failed to load stations from {}", db_path.display()))?;
    let vehicle = VehicleConfig::from_env()
        .context("invalid vehicle settings in the environment")?
        .with_overrides(max_range, mpg);
    let maps = mapquest()?;

    let origin = maps
        .geocode(from)
        .with_context(|| format!("failed to geocode '{from}'"))?;
    let destination = maps
        .geocode(to)
        .with_context(|| format!("failed to geocode '{to}'"))?;
    let route = maps
        .route(origin, destination)
        .with_context(|| format!("failed to route from '{from}' to '{to}'"))?;
    let plan = plan_fuel_stops(&route, &catalog, &vehicle).context("failed to plan fuel stops")?;

    if json {
        let report = PlanReport { from, to, plan: &plan };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_plan(from, to, &plan, &ColorPalette::detect()));
    }
    Ok(())
}

fn handle_station(db_path: &Path, id: StationId, json: bool) -> Result<()> {
    let connection = open_store_read_only(db_path)
        .with_context(|| format!("failed to open {}", db_path.display()))?;
    let station = station_by_id(&connection, id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&station)?);
    } else {
        print!("{}", render_station(&station, &ColorPalette::detect()));
    }
    Ok(())
}

fn handle_stations(db_path: &Path, json: bool) -> Result<()> {
    let catalog = load_catalog(db_path)
        .with_context(|| format!("failed to load stations from {}", db_path.display()))?;
    let summary = catalog.summary();

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", render_summary(&summary));
    }
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
