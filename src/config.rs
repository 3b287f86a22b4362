//! Simulation settings
//!
//! Loaded from an optional JSON file by the runner; every field falls back
//! to its default when missing.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{SimError, SimResult};

/// Inclusive integer range sampled uniformly during scene layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntRange {
    pub min: i32,
    pub max: i32,
}

impl IntRange {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// True if `min <= max`
    pub fn is_ordered(&self) -> bool {
        self.min <= self.max
    }
}

/// Simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === Bounds ===
    /// Arena width (x = 0 .. width)
    pub width: u32,
    /// Arena height (y = 0 .. height)
    pub height: u32,

    // === Broad phase ===
    /// Grid columns across the width
    pub grid_columns: u32,
    /// Grid rows across the height
    pub grid_rows: u32,

    // === Scene layout ===
    /// Bodies per lattice row
    pub body_columns: u32,
    /// Bodies per lattice column
    pub body_rows: u32,
    /// Circumradius, in units of 1% of the width
    pub radius_range: IntRange,
    /// Corner count of each polygon
    pub corner_range: IntRange,
    /// Per-axis initial velocity, in units of 1% of the width per second
    pub velocity_range: IntRange,
    /// Mass per unit area
    pub density: f64,
    /// RNG seed for the layout
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,

            grid_columns: DEFAULT_GRID_COLUMNS,
            grid_rows: DEFAULT_GRID_ROWS,

            body_columns: 3,
            body_rows: 3,
            radius_range: IntRange::new(5, 8),
            corner_range: IntRange::new(3, 6),
            velocity_range: IntRange::new(-10, 10),
            density: DEFAULT_DENSITY,
            seed: 0x5EED,
        }
    }
}

impl SimConfig {
    /// Check every setting, returning the first problem found
    pub fn validate(&self) -> SimResult<()> {
        let invalid = |reason: &'static str| -> SimResult<()> { Err(SimError::InvalidConfig { reason }) };

        if self.width == 0 || self.height == 0 {
            return invalid("width and height must be positive");
        }
        if self.grid_columns == 0 || self.grid_rows == 0 {
            return invalid("grid columns and rows must be positive");
        }
        if !self.radius_range.is_ordered() || self.radius_range.min <= 0 {
            return invalid("radius range must be positive and ordered");
        }
        if !self.corner_range.is_ordered() || self.corner_range.min < 3 {
            return invalid("corner range must start at 3 or more");
        }
        if !self.velocity_range.is_ordered() {
            return invalid("velocity range must be ordered");
        }
        if !(self.density.is_finite() && self.density > 0.0) {
            return invalid("density must be positive and finite");
        }
        Ok(())
    }

    /// Length unit for radius and velocity ranges (1% of the width)
    pub fn layout_unit(&self) -> f64 {
        self.width as f64 * 0.01
    }

    pub fn from_json(json: &str) -> SimResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> SimResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Write settings to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> SimResult<()> {
        std::fs::write(path.as_ref(), self.to_json()?)?;
        log::info!("Config saved to {}", path.as_ref().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SimConfig::from_json(r#"{ "width": 640, "grid_rows": 4 }"#).unwrap();
        assert_eq!(config.width, 640);
        assert_eq!(config.grid_rows, 4);
        assert_eq!(config.height, DEFAULT_HEIGHT);
        assert_eq!(config.grid_columns, DEFAULT_GRID_COLUMNS);
    }

    #[test]
    fn test_rejects_zero_grid() {
        let config = SimConfig {
            grid_columns: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SimError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_rejects_two_corners() {
        let config = SimConfig {
            corner_range: IntRange::new(2, 4),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_round_trip_preserves_seed() {
        let config = SimConfig {
            seed: 42,
            ..Default::default()
        };
        let back = SimConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(back, config);
    }
}
