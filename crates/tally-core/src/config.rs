//! Forecast tuning configuration
//!
//! Config is loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/tally/config/forecast.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Only the recency window and the blend weight are tunable. The regression
//! sample minimum and the singularity threshold are fixed in
//! [`crate::forecast::regression`].

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/forecast.toml");

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastConfig {
    /// How many trailing history months feed the recent averages
    pub recency_window: usize,
    /// Regression weight when the target month was chosen explicitly
    pub blend_alpha: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            recency_window: 3,
            blend_alpha: 0.6,
        }
    }
}

impl ForecastConfig {
    /// Load the override file from the data dir if present, else the embedded defaults
    pub fn load() -> Result<Self> {
        load_config(None)
    }

    /// Load from an explicit path, falling back to embedded defaults if it does not exist
    pub fn from_path(path: &Path) -> Result<Self> {
        load_config(Some(path))
    }

    /// Parse a TOML document
    pub fn from_toml(content: &str) -> Result<Self> {
        parse_config(content)
    }

    fn validate(self) -> Result<Self> {
        if self.recency_window == 0 {
            return Err(Error::InvalidData(
                "recency_window must be at least 1".to_string(),
            ));
        }
        if !self.blend_alpha.is_finite() || !(0.0..=1.0).contains(&self.blend_alpha) {
            return Err(Error::InvalidData(format!(
                "blend_alpha must be between 0 and 1, got {}",
                self.blend_alpha
            )));
        }
        Ok(self)
    }
}

/// Default override location for the forecast config
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("tally").join("config").join("forecast.toml"))
}

fn load_config(override_path: Option<&Path>) -> Result<ForecastConfig> {
    let path = match override_path {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path(),
    };

    let content = match path {
        Some(path) if path.exists() => {
            debug!(path = %path.display(), "Loading forecast config override");
            fs::read_to_string(&path)
                .map_err(|e| Error::InvalidData(format!("Failed to read config: {}", e)))?
        }
        _ => DEFAULT_CONFIG.to_string(),
    };

    parse_config(&content)
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    heuristic: Option<RawHeuristic>,
    regression: Option<RawRegression>,
}

#[derive(Debug, Deserialize)]
struct RawHeuristic {
    recency_window: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawRegression {
    blend_alpha: Option<f64>,
}

fn parse_config(content: &str) -> Result<ForecastConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::InvalidData(format!("Invalid config TOML: {}", e)))?;

    let mut config = ForecastConfig::default();

    if let Some(window) = raw.heuristic.and_then(|h| h.recency_window) {
        config.recency_window = window;
    }
    if let Some(alpha) = raw.regression.and_then(|r| r.blend_alpha) {
        config.blend_alpha = alpha;
    }

    config.validate()
}
