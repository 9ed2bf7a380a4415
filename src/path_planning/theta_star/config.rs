//! Configuration for the Theta* planner

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::{NavigationError, NavigationResult};

/// Maximum robot radius in meters, the default grid cell size
pub const ROBOT_MAX_RADIUS_METERS: f64 = 0.09;

/// Default cap on grid cells, about 184 m x 184 m at the default cell size
pub const DEFAULT_MAX_CELLS: usize = 1 << 22;

/// Configuration for Theta* planner
///
/// The blocked-endpoint constants were tuned for one robot footprint;
/// re-check them whenever `cell_size` changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThetaStarConfig {
    /// Grid cell size in meters (robot radius)
    pub cell_size: f64,
    /// Start/end closer than this (meters) get a direct path
    pub close_to_end_threshold: f64,
    /// Multiple of `close_to_end_threshold` treated as close when the end
    /// point had to be moved out of an obstacle
    pub blocked_end_oscillation_mitigation: f64,
    /// Number of search steps per meter around a blocked endpoint
    pub blocked_end_search_resolution: f64,
    /// How far (meters) to look for a free point around a blocked endpoint
    pub blocked_end_search_radius: f64,
    /// Use line-of-sight parent shortcuts (false = plain 8-connected A*)
    pub any_angle: bool,
    /// Largest grid a search may allocate; bigger areas get no path unless
    /// a direct route exists
    pub max_cells: usize,
}

impl Default for ThetaStarConfig {
    fn default() -> Self {
        Self {
            cell_size: ROBOT_MAX_RADIUS_METERS,
            close_to_end_threshold: 0.01,
            blocked_end_oscillation_mitigation: 2.0,
            blocked_end_search_resolution: 50.0,
            blocked_end_search_radius: 2.0,
            any_angle: true,
            max_cells: DEFAULT_MAX_CELLS,
        }
    }
}

impl ThetaStarConfig {
    /// Parse a configuration from TOML; missing keys take default values
    pub fn from_toml_str(s: &str) -> NavigationResult<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> NavigationResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Same settings with the line-of-sight shortcut disabled
    pub fn grid_only(self) -> Self {
        Self {
            any_angle: false,
            ..self
        }
    }

    pub fn validate(&self) -> NavigationResult<()> {
        let positive = [
            ("cell_size", self.cell_size),
            ("close_to_end_threshold", self.close_to_end_threshold),
            ("blocked_end_search_resolution", self.blocked_end_search_resolution),
            ("blocked_end_search_radius", self.blocked_end_search_radius),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(NavigationError::InvalidParameter(format!(
                    "{} must be positive and finite, got {}",
                    name, value
                )));
            }
        }
        if !self.blocked_end_oscillation_mitigation.is_finite()
            || self.blocked_end_oscillation_mitigation < 1.0
        {
            return Err(NavigationError::InvalidParameter(format!(
                "blocked_end_oscillation_mitigation must be >= 1, got {}",
                self.blocked_end_oscillation_mitigation
            )));
        }
        // Cell pairs are packed into a u64 visibility key
        if self.max_cells == 0 || self.max_cells > u32::MAX as usize {
            return Err(NavigationError::InvalidParameter(format!(
                "max_cells must be in 1..={}, got {}",
                u32::MAX,
                self.max_cells
            )));
        }
        Ok(())
    }
}
