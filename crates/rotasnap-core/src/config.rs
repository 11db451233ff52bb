//! Engine configuration supplied by the host.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Smallest width or height a committed rectangle may have.
pub const MIN_SIZE: f64 = 4.0;

/// Distance (in world units) below which an edge snaps to a sibling.
pub const DISTANCE_THRESHOLD: f64 = 8.0;

/// Minimum time between two handled pointer moves.
pub const THROTTLE_DELAY_MS: u64 = 30;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config parse error: {0}")]
    Parse(String),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Policy and tuning values for a gesture.
///
/// Passed explicitly into every session; nothing is read from global state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Keep the width/height ratio during corner resizes.
    pub aspect_locked: bool,
    /// Snap distance threshold (exclusive).
    pub snap_threshold: f64,
    /// Minimum width/height of an accepted candidate.
    pub min_size: f64,
    /// Pointer-move throttle window in milliseconds.
    pub throttle_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            aspect_locked: false,
            snap_threshold: DISTANCE_THRESHOLD,
            min_size: MIN_SIZE,
            throttle_ms: THROTTLE_DELAY_MS,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Set the aspect-lock policy.
    pub fn with_aspect_locked(mut self, aspect_locked: bool) -> Self {
        self.aspect_locked = aspect_locked;
        self
    }

    /// Check that thresholds are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.snap_threshold.is_finite() && self.snap_threshold >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "snap_threshold must be a non-negative number, got {}",
                self.snap_threshold
            )));
        }
        if !(self.min_size.is_finite() && self.min_size > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "min_size must be positive, got {}",
                self.min_size
            )));
        }
        Ok(())
    }

    /// The throttle window as a `Duration`.
    pub fn throttle_interval(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }
}
