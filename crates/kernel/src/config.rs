//! Editor constants, loadable from JSON.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Tolerance;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid editor config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },
}

/// Constants used by the scene commands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Distance along the pick ray at which new primitives are placed.
    pub place_depth: f64,
    /// Factor applied by a scale-up step.
    pub scale_up: f64,
    /// Factor applied by a scale-down step.
    pub scale_down: f64,
    /// Height used when extruding without an explicit value.
    pub extrusion_height: f64,
    /// Size multiplier for planes built from three points.
    pub plane_scale: f64,
    pub tolerance: Tolerance,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            place_depth: 5.0,
            scale_up: 1.1,
            scale_down: 0.9,
            extrusion_height: 1.0,
            plane_scale: 1.0,
            tolerance: Tolerance::default(),
        }
    }
}

impl EditorConfig {
    /// Parse a config; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("place_depth", self.place_depth),
            ("scale_up", self.scale_up),
            ("scale_down", self.scale_down),
            ("plane_scale", self.plane_scale),
        ];
        for (field, value) in fields {
            if !(value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        Ok(())
    }
}
