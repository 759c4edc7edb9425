//! Geographic primitives: validated coordinates and great-circle distances.
//!
//! All distances in this crate are statute miles measured on a spherical
//! Earth. That is accurate to well under one percent for the continental
//! routes the planner deals with, which is tighter than the variation between
//! a road polyline and the odometer anyway.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Mean Earth radius in statute miles.
pub const EARTH_RADIUS_MILES: f64 = 3958.8;

/// Miles per degree of latitude (and of longitude at the equator).
pub const MILES_PER_DEGREE: f64 = EARTH_RADIUS_MILES * std::f64::consts::PI / 180.0;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    /// Create a coordinate, rejecting non-finite or out-of-range values.
    pub fn new(lat: f64, lon: f64) -> Result<Self> {
        let coordinate = Self { lat, lon };
        coordinate.validate()?;
        Ok(coordinate)
    }

    /// Check that latitude is within [-90, 90] and longitude within [-180, 180].
    pub fn validate(&self) -> Result<()> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(Error::invalid(format!(
                "latitude must be within [-90, 90], got {}",
                self.lat
            )));
        }
        if !self.lon.is_finite() || !(-180.0..=180.0).contains(&self.lon) {
            return Err(Error::invalid(format!(
                "longitude must be within [-180, 180], got {}",
                self.lon
            )));
        }
        Ok(())
    }

    /// Great-circle distance to another coordinate in miles (haversine).
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let dlat = lat2 - lat1;
        let dlon = (other.lon - self.lon).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_MILES * a.sqrt().min(1.0).asin()
    }

    /// Position on the unit sphere, used as the KD-tree key.
    pub fn unit_vector(&self) -> [f64; 3] {
        let lat = self.lat.to_radians();
        let lon = self.lon.to_radians();
        [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
    }

    /// `[lat, lon]` pair as used in API responses.
    pub fn as_pair(&self) -> [f64; 2] {
        [self.lat, self.lon]
    }
}

/// Straight-line distance through the unit sphere for a surface arc of `miles`.
///
/// Chord length never exceeds the arc, so a chord radius derived from an arc
/// radius is a safe bound for spatial pruning.
pub fn chord_for_arc(miles: f64) -> f64 {
    let angle = (miles / EARTH_RADIUS_MILES).min(std::f64::consts::PI);
    2.0 * (angle / 2.0).sin()
}

/// Equirectangular projection anchored at a reference coordinate.
///
/// Maps nearby coordinates to planar miles (x east, y north). Used for the
/// point-to-segment test where segments are at most a few dozen miles long.
#[derive(Debug, Clone, Copy)]
pub struct LocalProjection {
    origin: Coordinate,
    lon_scale: f64,
}

impl LocalProjection {
    /// Anchor the projection at `origin`, scaling longitude at `reference_lat`.
    pub fn new(origin: Coordinate, reference_lat: f64) -> Self {
        Self {
            origin,
            lon_scale: reference_lat.to_radians().cos() * MILES_PER_DEGREE,
        }
    }

    /// Project a coordinate into planar miles relative to the origin.
    pub fn project(&self, point: &Coordinate) -> (f64, f64) {
        let x = (point.lon - self.origin.lon) * self.lon_scale;
        let y = (point.lat - self.origin.lat) * MILES_PER_DEGREE;
        (x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_coordinates() {
        assert!(Coordinate::new(91.0, 0.0).is_err());
        assert!(Coordinate::new(0.0, -180.5).is_err());
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(-90.0, 180.0).is_ok());
    }

    #[test]
    fn one_degree_of_latitude_is_about_69_miles() {
        let a = Coordinate::new(35.0, -97.0).unwrap();
        let b = Coordinate::new(36.0, -97.0).unwrap();
        assert!((a.distance_to(&b) - MILES_PER_DEGREE).abs() < 1e-6);
    }

    #[test]
    fn houston_to_dallas_is_roughly_225_miles() {
        let houston = Coordinate::new(29.7604, -95.3698).unwrap();
        let dallas = Coordinate::new(32.7767, -96.7970).unwrap();
        let miles = houston.distance_to(&dallas);
        assert!((220.0..230.0).contains(&miles), "got {miles}");
    }

    #[test]
    fn chord_is_never_longer_than_arc() {
        for miles in [0.0, 1.0, 50.0, 500.0, 5000.0] {
            let chord_miles = chord_for_arc(miles) * EARTH_RADIUS_MILES;
            assert!(chord_miles <= miles + 1e-9);
        }
    }

    #[test]
    fn projection_preserves_short_distances() {
        let origin = Coordinate::new(40.0, -100.0).unwrap();
        let point = Coordinate::new(40.05, -99.95).unwrap();
        let projection = LocalProjection::new(origin, 40.0);
        let (x, y) = projection.project(&point);
        let planar = (x * x + y * y).sqrt();
        assert!((planar - origin.distance_to(&point)).abs() < 0.01);
    }
}
