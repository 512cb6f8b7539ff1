//! Link delay models
//!
//! A [`DelayModel`] is sampled once when a link is created and again on
//! every ping. Delays are milliseconds of simulated latency.

use hopnet_core::DelayModel;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{ConfigError, DelayConfig};

/// Always yields the same delay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FixedDelay(pub u64);

impl DelayModel for FixedDelay {
    fn sample(&mut self) -> u64 {
        self.0
    }
}

/// Uniform integer delay over the inclusive range `[min, max]`
#[derive(Debug, Clone)]
pub struct UniformDelay {
    min: u64,
    max: u64,
    rng: StdRng,
}

impl UniformDelay {
    /// Seeded model; the same seed always yields the same sequence
    pub fn new(min: u64, max: u64, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(min, max, StdRng::seed_from_u64(seed))
    }

    /// Model seeded from OS entropy
    pub fn from_entropy(min: u64, max: u64) -> Result<Self, ConfigError> {
        Self::with_rng(min, max, StdRng::from_os_rng())
    }

    /// `[0, 0]`: every link has zero delay
    pub fn fixed_zero() -> Self {
        Self {
            min: 0,
            max: 0,
            rng: StdRng::seed_from_u64(0),
        }
    }

    pub fn from_config(config: &DelayConfig) -> Result<Self, ConfigError> {
        match config.seed {
            Some(seed) => Self::new(config.min_ms, config.max_ms, seed),
            None => Self::from_entropy(config.min_ms, config.max_ms),
        }
    }

    fn with_rng(min: u64, max: u64, rng: StdRng) -> Result<Self, ConfigError> {
        if min > max {
            return Err(ConfigError::InvalidDelayRange { min, max });
        }
        Ok(Self { min, max, rng })
    }

    pub fn range(&self) -> (u64, u64) {
        (self.min, self.max)
    }
}

impl Default for UniformDelay {
    fn default() -> Self {
        Self::fixed_zero()
    }
}

impl DelayModel for UniformDelay {
    fn sample(&mut self) -> u64 {
        if self.min == self.max {
            return self.min;
        }
        self.rng.random_range(self.min..=self.max)
    }
}
