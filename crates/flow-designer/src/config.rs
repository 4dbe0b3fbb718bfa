//! Designer configuration storage
//!
//! Canvas geometry, zoom limits and frame cadence. Persisted as JSON next to
//! the host's other settings; a missing file means defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::constants::{canvas, geometry, timing, CONFIG_FILE};

/// Tunable designer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignerConfig {
    /// Background grid spacing (graph units)
    pub grid_size: f64,
    /// Lower zoom bound
    pub zoom_min: f64,
    /// Upper zoom bound
    pub zoom_max: f64,
    /// Multiplicative step per wheel notch
    pub zoom_step: f64,
    /// Node width (graph units)
    pub node_width: f64,
    /// Node height (graph units)
    pub node_height: f64,
    /// Drawn port radius (graph units)
    pub port_radius: f64,
    /// Port pick radius (graph units)
    pub port_hit_radius: f64,
    /// Connection pick tolerance (screen pixels)
    pub connection_hit_tolerance: f64,
    /// Bezier control point offset (graph units)
    pub curve_control_offset: f64,
    /// Interval between frames for the timer-driven loop
    pub frame_interval_ms: u64,
}

impl Default for DesignerConfig {
    fn default() -> Self {
        Self {
            grid_size: canvas::GRID_SIZE,
            zoom_min: canvas::ZOOM_MIN,
            zoom_max: canvas::ZOOM_MAX,
            zoom_step: canvas::ZOOM_STEP,
            node_width: geometry::NODE_WIDTH,
            node_height: geometry::NODE_HEIGHT,
            port_radius: geometry::PORT_RADIUS,
            port_hit_radius: geometry::PORT_HIT_RADIUS,
            connection_hit_tolerance: geometry::CONNECTION_HIT_TOLERANCE,
            curve_control_offset: geometry::CURVE_CONTROL_OFFSET,
            frame_interval_ms: timing::FRAME_INTERVAL_MS,
        }
    }
}

impl DesignerConfig {
    /// Load configuration from `dir/designer.json`
    pub async fn load(dir: &Path) -> Result<Self, ConfigError> {
        let config_path = dir.join(CONFIG_FILE);

        if !config_path.exists() {
            log::debug!("No designer config at {:?}, using defaults", config_path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&config_path)
            .await
            .map_err(ConfigError::Io)?;

        let config: Self = serde_json::from_str(&contents).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to `dir/designer.json`
    pub async fn save(&self, dir: &Path) -> Result<(), ConfigError> {
        fs::create_dir_all(dir).await.map_err(ConfigError::Io)?;

        let config_path = dir.join(CONFIG_FILE);
        let contents = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;

        fs::write(&config_path, contents)
            .await
            .map_err(ConfigError::Io)?;

        log::info!("Designer configuration saved to {:?}", config_path);
        Ok(())
    }

    /// Reject settings the interaction engine cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !(positive(self.zoom_min) && positive(self.zoom_max) && self.zoom_min <= self.zoom_max)
        {
            return Err(ConfigError::Invalid(format!(
                "zoom bounds must satisfy 0 < min <= max, got [{}, {}]",
                self.zoom_min, self.zoom_max
            )));
        }
        if !(self.zoom_step.is_finite() && self.zoom_step > 1.0) {
            return Err(ConfigError::Invalid(format!(
                "zoom step must be greater than 1, got {}",
                self.zoom_step
            )));
        }
        if !(positive(self.grid_size) && positive(self.node_width) && positive(self.node_height)) {
            return Err(ConfigError::Invalid(
                "grid and node sizes must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(serde_json::Error),
    #[error("Failed to serialize config: {0}")]
    Serialize(serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}
