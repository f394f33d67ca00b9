//! Engine configuration.
//!
//! The only tunable today is the percent-complete floor used when forecasting
//! EAC. Data sources disagree on it (0.005 vs 0.01), so it is read from an
//! optional TOML file instead of being baked in.
use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_POC_FLOOR: f64 = 0.005;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MetricsConfig {
    /// Smallest percent-complete fraction EAC will ever divide by. Never 0.
    pub poc_floor: f64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            poc_floor: DEFAULT_POC_FLOOR,
        }
    }
}

impl MetricsConfig {
    pub fn with_poc_floor(poc_floor: f64) -> Result<Self, ConfigError> {
        let cfg = Self { poc_floor };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.poc_floor.is_finite() || self.poc_floor <= 0.0 || self.poc_floor > 1.0 {
            return Err(ConfigError::InvalidPocFloor(self.poc_floor));
        }
        Ok(())
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: MetricsConfig = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
