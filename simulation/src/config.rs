//! Simulation configuration
//!
//! Loaded from JSON; every field has a default so a partial file (or no
//! file at all) is fine.

use std::fs;
use std::path::Path;

use hopnet_routing::DEFAULT_HOP_BUDGET;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid delay range: min {min}ms is greater than max {max}ms")]
    InvalidDelayRange { min: u64, max: u64 },

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Link delay distribution: uniform over `[min_ms, max_ms]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelayConfig {
    pub min_ms: u64,
    pub max_ms: u64,
    /// Fixed seed for reproducible delays; OS entropy when absent
    pub seed: Option<u64>,
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            min_ms: 0,
            max_ms: 0,
            seed: None,
        }
    }
}

impl DelayConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_ms > self.max_ms {
            return Err(ConfigError::InvalidDelayRange {
                min: self.min_ms,
                max: self.max_ms,
            });
        }
        Ok(())
    }
}

/// Configuration for the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Hop budget used when a send does not name one
    pub hop_budget: u32,
    /// Link delay distribution
    pub delay: DelayConfig,
    /// Sleep for each traversed link's delay
    pub pace_real_time: bool,
    /// Log every visited node at `info`
    pub trace_routing: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            hop_budget: DEFAULT_HOP_BUDGET,
            delay: DelayConfig::default(),
            pace_real_time: false,
            trace_routing: true,
        }
    }
}

impl SimConfig {
    /// Load and validate a JSON config file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.delay.validate()
    }

    /// Quiet, deterministic settings for tests and benches
    pub fn quiet() -> Self {
        Self {
            trace_routing: false,
            delay: DelayConfig {
                seed: Some(0),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}
