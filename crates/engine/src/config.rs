use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::EngineError;

fn default_min_size() -> f64 {
    30.0
}

fn default_max_size() -> f64 {
    300.0
}

fn default_max_dimension() -> f64 {
    80.0
}

fn default_anchor_snap_distance() -> f64 {
    24.0
}

/// Tunables for the overlay. Every field falls back to its default when
/// missing from the source text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayConfig {
    /// Lower bound for the side of a resized decoration.
    #[serde(default = "default_min_size")]
    pub min_size: f64,

    /// Upper bound for the side of a resized decoration.
    #[serde(default = "default_max_size")]
    pub max_size: f64,

    /// Largest side of a freshly dropped image.
    #[serde(default = "default_max_dimension")]
    pub default_max_dimension: f64,

    /// How far outside a day cell a dragged decoration's center may be and
    /// still anchor to it.
    #[serde(default = "default_anchor_snap_distance")]
    pub anchor_snap_distance: f64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            min_size: default_min_size(),
            max_size: default_max_size(),
            default_max_dimension: default_max_dimension(),
            anchor_snap_distance: default_anchor_snap_distance(),
        }
    }
}

impl OverlayConfig {
    pub fn from_json_str(contents: &str) -> Result<Self, EngineError> {
        let mut config: Self =
            serde_json::from_str(contents).map_err(|e| EngineError::Config(e.to_string()))?;
        config.validate_and_clamp();
        Ok(config)
    }

    /// Replaces out-of-range values with defaults instead of rejecting the
    /// whole config.
    pub fn validate_and_clamp(&mut self) {
        let defaults = Self::default();
        if !(self.min_size.is_finite() && self.min_size > 0.0) {
            warn!(min_size = self.min_size, "Invalid min_size, using default");
            self.min_size = defaults.min_size;
        }
        if !self.max_size.is_finite() || self.max_size < self.min_size {
            warn!(
                max_size = self.max_size,
                min_size = self.min_size,
                "max_size below min_size, using default"
            );
            self.max_size = defaults.max_size.max(self.min_size);
        }
        if !(self.default_max_dimension.is_finite() && self.default_max_dimension > 0.0) {
            warn!(
                value = self.default_max_dimension,
                "Invalid default_max_dimension, using default"
            );
            self.default_max_dimension = defaults.default_max_dimension;
        }
        if !(self.anchor_snap_distance.is_finite() && self.anchor_snap_distance >= 0.0) {
            warn!(value = self.anchor_snap_distance, "Invalid anchor_snap_distance, using default");
            self.anchor_snap_distance = defaults.anchor_snap_distance;
        }
    }
}
