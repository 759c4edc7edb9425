//! Vehicle parameters for fuel planning.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default range on a full tank, in miles.
pub const DEFAULT_MAX_RANGE_MILES: f64 = 500.0;

/// Default fuel economy, in miles per gallon.
pub const DEFAULT_MILES_PER_GALLON: f64 = 10.0;

/// Default corridor half-width, in miles.
pub const DEFAULT_CORRIDOR_MILES: f64 = 5.0;

/// Vehicle and search parameters for a planning call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleConfig {
    /// Distance the vehicle can travel on a full tank.
    pub max_range_miles: f64,
    /// Fuel economy used to convert range-miles into gallons.
    pub miles_per_gallon: f64,
    /// Maximum distance between a station and the route polyline.
    pub corridor_miles: f64,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            max_range_miles: DEFAULT_MAX_RANGE_MILES,
            miles_per_gallon: DEFAULT_MILES_PER_GALLON,
            corridor_miles: DEFAULT_CORRIDOR_MILES,
        }
    }
}

impl VehicleConfig {
    /// Read overrides from `FUEL_MAX_RANGE_MILES`, `FUEL_MILES_PER_GALLON`,
    /// and `FUEL_CORRIDOR_MILES`, falling back to the defaults.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            max_range_miles: env_f64("FUEL_MAX_RANGE_MILES", defaults.max_range_miles)?,
            miles_per_gallon: env_f64("FUEL_MILES_PER_GALLON", defaults.miles_per_gallon)?,
            corridor_miles: env_f64("FUEL_CORRIDOR_MILES", defaults.corridor_miles)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Copy of this config with per-request overrides applied.
    pub fn with_overrides(&self, max_range: Option<f64>, miles_per_gallon: Option<f64>) -> Self {
        Self {
            max_range_miles: max_range.unwrap_or(self.max_range_miles),
            miles_per_gallon: miles_per_gallon.unwrap_or(self.miles_per_gallon),
            corridor_miles: self.corridor_miles,
        }
    }

    /// Validate the vehicle configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.max_range_miles.is_finite() || self.max_range_miles <= 0.0 {
            return Err(Error::invalid(format!(
                "max_range_miles must be a positive number, got {}",
                self.max_range_miles
            )));
        }

        if !self.miles_per_gallon.is_finite() || self.miles_per_gallon <= 0.0 {
            return Err(Error::invalid(format!(
                "miles_per_gallon must be a positive number, got {}",
                self.miles_per_gallon
            )));
        }

        if !self.corridor_miles.is_finite() || self.corridor_miles < 0.0 {
            return Err(Error::invalid(format!(
                "corridor_miles must be zero or positive, got {}",
                self.corridor_miles
            )));
        }

        Ok(())
    }

    /// Gallons needed to cover `miles`.
    pub fn gallons_for(&self, miles: f64) -> f64 {
        miles / self.miles_per_gallon
    }
}

fn env_f64(name: &str, default: f64) -> Result<f64> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .map_err(|_| Error::invalid(format!("{name} must be a number, got '{raw}'"))),
        Err(_) => Ok(default),
    }
}
