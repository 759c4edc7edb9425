//! Integration tests for the `fuelroute` binary.
//!
//! Each test imports the CSV fixture into a fresh temporary database without
//! geocoding, so nothing here touches the network.

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn fixture_csv() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures/stations.csv")
}

/// Temporary database seeded from the fixture.
struct TestEnv {
    _temp_dir: TempDir,
    db_path: PathBuf,
}

impl TestEnv {
    fn empty() -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        let db_path = temp_dir.path().join("data").join("stations.db");
        Self {
            _temp_dir: temp_dir,
            db_path,
        }
    }

    fn imported() -> Self {
        let env = Self::empty();
        env.cmd()
            .args(["import", "--no-geocode"])
            .arg(fixture_csv())
            .assert()
            .success();
        env
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("fuelroute").expect("binary exists");
        cmd.arg("--db")
            .arg(&self.db_path)
            .env("NO_COLOR", "1")
            .env("RUST_LOG", "warn")
            .env_remove("FUELROUTE_DB_PATH")
            .env_remove("MAPQUEST_API_KEY");
        cmd
    }
}

#[test]
fn import_reports_counts() {
    let env = TestEnv::empty();
    env.cmd()
        .args(["import", "--no-geocode"])
        .arg(fixture_csv())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Processed 9 rows: 6 imported, 1 skipped, 2 failed",
        ));
    assert!(env.db_path.exists());
}

#[test]
fn import_without_key_requires_no_geocode_flag() {
    let env = TestEnv::empty();
    env.cmd()
        .arg("import")
        .arg(fixture_csv())
        .assert()
        .failure()
        .stderr(predicate::str::contains("--no-geocode"));
}

#[test]
fn station_shows_details() {
    let env = TestEnv::imported();
    env.cmd()
        .args(["station", "36"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PILOT TRAVEL CENTER #341 (id 36)"))
        .stdout(predicate::str::contains("I-40, EXIT 74, Amarillo, TX"))
        .stdout(predicate::str::contains("Rack ID:  1158"));
}

#[test]
fn station_json_output() {
    let env = TestEnv::imported();
    let output = env.cmd().args(["station", "7", "--json"]).output().unwrap();
    assert!(output.status.success());

    let station: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(station["id"], 7);
    // First row for a duplicated id wins.
    assert_eq!(station["price"], 3.00733333);
}

#[test]
fn unknown_station_fails() {
    let env = TestEnv::imported();
    env.cmd()
        .args(["station", "12345"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown station id 12345"));
}

#[test]
fn stations_summary() {
    let env = TestEnv::imported();
    env.cmd()
        .arg("stations")
        .assert()
        .success()
        .stdout(predicate::str::contains("Stations: 6"))
        .stdout(predicate::str::contains("States:   4"));

    let output = env.cmd().args(["stations", "--json"]).output().unwrap();
    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["stations"], 6);
    assert_eq!(summary["min_price"], 3.00733333);
    assert_eq!(summary["max_price"], 3.799);
}

#[test]
fn missing_database_is_reported() {
    let env = TestEnv::empty();
    env.cmd()
        .arg("stations")
        .assert()
        .failure()
        .stderr(predicate::str::contains("station database not found"));
}

#[test]
fn plan_requires_mapquest_key() {
    let env = TestEnv::imported();
    env.cmd()
        .args(["plan", "--from", "Oklahoma City, OK", "--to", "Flagstaff, AZ"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("MAPQUEST_API_KEY"));
}

#[test]
fn plan_requires_both_locations() {
    let env = TestEnv::imported();
    env.cmd()
        .args(["plan", "--from", "Oklahoma City, OK"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--to"));
}
