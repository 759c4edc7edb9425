//! Corridor search: stations within a fixed distance of a route polyline.

use std::collections::HashMap;

use crate::catalog::{Station, StationCatalog};
use crate::geo::{chord_for_arc, LocalProjection};

use super::{Route, RoutePoint};

/// A station near the route with its position along it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate<'a> {
    pub station: &'a Station,
    /// Cumulative distance from the origin to the station's projection on the route.
    pub distance_along_route: f64,
}

/// Stations within `corridor_miles` of any segment of `route`.
///
/// Each station appears once, at its smallest distance along the route.
/// Output is sorted by that distance, ties broken by station id.
pub fn find_candidates<'a>(
    route: &Route,
    catalog: &'a StationCatalog,
    corridor_miles: f64,
) -> Vec<Candidate<'a>> {
    if catalog.is_empty() || !corridor_miles.is_finite() || corridor_miles < 0.0 {
        return Vec::new();
    }

    let points = route.route_points();
    let corridor_chord = chord_for_arc(corridor_miles);
    let mut nearest: HashMap<usize, f64> = HashMap::new();

    for segment in points.windows(2) {
        let (start, end) = (&segment[0], &segment[1]);
        let segment_miles = start.coordinate.distance_to(&end.coordinate);

        let a = start.coordinate.unit_vector();
        let b = end.coordinate.unit_vector();
        let midpoint = [(a[0] + b[0]) / 2.0, (a[1] + b[1]) / 2.0, (a[2] + b[2]) / 2.0];
        let search_chord = corridor_chord + chord_for_arc(segment_miles);

        for index in catalog.indices_within_chord(midpoint, search_chord) {
            let station = catalog.station(index);
            if let Some(along) = distance_along_segment(start, end, station, corridor_miles) {
                nearest
                    .entry(index)
                    .and_modify(|best| *best = best.min(along))
                    .or_insert(along);
            }
        }
    }

    let mut candidates: Vec<Candidate<'a>> = nearest
        .into_iter()
        .map(|(index, distance_along_route)| Candidate {
            station: catalog.station(index),
            distance_along_route,
        })
        .collect();

    candidates.sort_by(|left, right| {
        left.distance_along_route
            .total_cmp(&right.distance_along_route)
            .then(left.station.id.cmp(&right.station.id))
    });
    candidates
}

/// Cumulative distance of the station's projection onto the segment, or
/// `None` when the station is further than `corridor_miles` from it.
fn distance_along_segment(
    start: &RoutePoint,
    end: &RoutePoint,
    station: &Station,
    corridor_miles: f64,
) -> Option<f64> {
    let reference_lat = (start.coordinate.lat + end.coordinate.lat) / 2.0;
    let projection = LocalProjection::new(start.coordinate, reference_lat);

    let (dx, dy) = projection.project(&end.coordinate);
    let (px, py) = projection.project(&station.location);

    let length_squared = dx * dx + dy * dy;
    let t = if length_squared > 0.0 {
        ((px * dx + py * dy) / length_squared).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let (cx, cy) = (px - t * dx, py - t * dy);
    let offset = (cx * cx + cy * cy).sqrt();
    if offset > corridor_miles {
        return None;
    }

    let span = end.distance_from_start - start.distance_from_start;
    Some(start.distance_from_start + t * span)
}
