//! Tuning knobs for exit reconstruction.

use pierce_math::WALL_AVOIDANCE_PADDING;
use serde::{Deserialize, Serialize};

use crate::error::{QueryError, Result};

/// Settings for exit-aware casts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Distance reverse casts start away from surfaces, and ricochets away from the hit.
    pub wall_avoidance_padding: f32,
    /// Start the reverse cast just past the furthest possible exit instead of at the cast end.
    pub optimize_backwards_length: bool,
    /// Retries of a reverse cast that made no progress.
    pub max_no_progress_retries: u32,
    /// Reverse hits at or under this distance count as no progress.
    pub no_progress_distance: f32,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            wall_avoidance_padding: WALL_AVOIDANCE_PADDING,
            optimize_backwards_length: true,
            max_no_progress_retries: 5,
            no_progress_distance: 1e-4,
        }
    }
}

impl QueryConfig {
    /// Validate the settings.
    pub fn validate(&self) -> Result<()> {
        if self.wall_avoidance_padding.is_nan() || self.wall_avoidance_padding <= 0.0 {
            return Err(QueryError::InvalidConfig(format!(
                "wall_avoidance_padding must be positive, got {}",
                self.wall_avoidance_padding
            )));
        }
        if self.no_progress_distance.is_nan() || self.no_progress_distance < 0.0 {
            return Err(QueryError::InvalidConfig(format!(
                "no_progress_distance must not be negative, got {}",
                self.no_progress_distance
            )));
        }
        Ok(())
    }
}
