//! Text and JSON rendering for CLI results.

use std::fmt::Write as _;

use serde::Serialize;

use fuelroute_lib::{CatalogSummary, ImportSummary, PlanResult, Station};

use crate::terminal::{format_miles, format_money, format_with_separators, ColorPalette};

/// JSON document printed by `plan --json`.
#[derive(Debug, Serialize)]
pub struct PlanReport<'a> {
    pub from: &'a str,
    pub to: &'a str,
    #[serde(flatten)]
    pub plan: &'a PlanResult,
}

/// Render a fuel plan as a tagged list of stops.
pub fn render_plan(from: &str, to: &str, plan: &PlanResult, palette: &ColorPalette) -> String {
    let p = palette;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Fuel plan {}{}{} -> {}{}{} ({}{}{})",
        p.white_bold,
        from,
        p.reset,
        p.white_bold,
        to,
        p.reset,
        p.cyan,
        format_miles(plan.total_distance),
        p.reset,
    );
    let _ = writeln!(out, "{}START{} {}", p.tag_start, p.reset, from);

    for stop in &plan.stops {
        let station = &stop.station;
        let _ = writeln!(
            out,
            "{}FUEL{}  {}{}{} (id {}) at {}{}{}",
            p.tag_fuel,
            p.reset,
            p.white_bold,
            station.name,
            p.reset,
            station.id,
            p.cyan,
            format_miles(stop.distance_from_start),
            p.reset,
        );
        let _ = writeln!(
            out,
            "      {}{}{}",
            p.gray,
            station.full_address(),
            p.reset
        );
        let _ = writeln!(
            out,
            "      {:.2} gal @ ${:.3}/gal = {}{}{}",
            stop.gallons,
            station.price,
            p.green,
            format_money(stop.cost),
            p.reset,
        );
    }

    let _ = writeln!(
        out,
        "{}GOAL{}  {} at {}{}{}",
        p.tag_goal,
        p.reset,
        to,
        p.cyan,
        format_miles(plan.total_distance),
        p.reset,
    );

    if plan.is_direct() {
        let _ = writeln!(out, "No fuel stops needed: the trip fits in one tank.");
    } else {
        let stops = plan.stops.len();
        let _ = writeln!(
            out,
            "{} stop{}, {:.2} gal, total fuel cost {}{}{}",
            stops,
            if stops == 1 { "" } else { "s" },
            plan.total_gallons,
            p.green,
            format_money(plan.total_fuel_cost),
            p.reset,
        );
    }
    out
}

/// Render one station's details.
pub fn render_station(station: &Station, palette: &ColorPalette) -> String {
    let p = palette;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}{}{} (id {})",
        p.white_bold, station.name, p.reset, station.id
    );
    let _ = writeln!(out, "  Address:  {}", station.full_address());
    if let Some(rack_id) = station.rack_id {
        let _ = writeln!(out, "  Rack ID:  {}", rack_id);
    }
    let _ = writeln!(out, "  Price:    {}${:.3}/gal{}", p.green, station.price, p.reset);
    let _ = writeln!(
        out,
        "  Location: {:.5}, {:.5}",
        station.location.lat, station.location.lon
    );
    out
}

/// Render catalog totals.
pub fn render_summary(summary: &CatalogSummary) -> String {
    if summary.stations == 0 {
        return "No stations in catalog\n".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Stations: {}",
        format_with_separators(summary.stations as u64)
    );
    let _ = writeln!(out, "States:   {}", summary.states);
    if let (Some(min), Some(max), Some(mean)) =
        (summary.min_price, summary.max_price, summary.mean_price)
    {
        let _ = writeln!(out, "Price:    ${min:.3} - ${max:.3} (mean ${mean:.3})");
    }
    out
}

/// One-line import report.
pub fn render_import(summary: &ImportSummary) -> String {
    format!(
        "Processed {} rows: {} imported, {} skipped, {} failed\n",
        format_with_separators(summary.processed as u64),
        summary.imported,
        summary.skipped,
        summary.failed
    )
}
