//! Drawer configuration: gesture thresholds, curve settings and 3-D box
//! defaults, loaded from JSON with per-field defaults.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::Deserialize;

use crate::consts::{
    AUTO_CLOSE_DISTANCE, BOX_DEFAULT_DEPTH, BOX_HIT_MARGIN, BOX_VANISHING_X, BOX_VANISHING_Y, HIT_TOLERANCE,
    MIN_SHAPE_SIZE, SPLINE_SAMPLES, SPLINE_TENSION, VERTEX_GRAB_THRESHOLD,
};
use crate::error::ConfigError;
use crate::geometry::NormalizedPoint;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DrawerConfig {
    /// Both dimensions of a dragged shape must exceed this to commit.
    pub min_size: f64,
    /// First/last point distance below which a polyline closes itself.
    pub auto_close_distance: f64,
    /// Grab radius for vertex editing.
    pub vertex_grab_threshold: f64,
    /// Tolerance used for selection hit-tests.
    pub hit_tolerance: f64,
    pub spline_tension: f64,
    pub spline_samples: usize,
    /// Depth applied to new boxes on release.
    pub box_default_depth: f64,
    /// Vanishing point applied to new boxes on release.
    pub box_vanishing_point: NormalizedPoint,
    pub box_hit_margin: f64,
}

impl Default for DrawerConfig {
    fn default() -> Self {
        Self {
            min_size: MIN_SHAPE_SIZE,
            auto_close_distance: AUTO_CLOSE_DISTANCE,
            vertex_grab_threshold: VERTEX_GRAB_THRESHOLD,
            hit_tolerance: HIT_TOLERANCE,
            spline_tension: SPLINE_TENSION,
            spline_samples: SPLINE_SAMPLES,
            box_default_depth: BOX_DEFAULT_DEPTH,
            box_vanishing_point: NormalizedPoint::new(BOX_VANISHING_X, BOX_VANISHING_Y),
            box_hit_margin: BOX_HIT_MARGIN,
        }
    }
}

impl DrawerConfig {
    /// Parse a JSON document. Absent fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or unknown fields and
    /// [`ConfigError::OutOfRange`] for the first field that fails validation.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field against its allowed range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::OutOfRange`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("min_size", self.min_size)?;
        non_negative("auto_close_distance", self.auto_close_distance)?;
        non_negative("vertex_grab_threshold", self.vertex_grab_threshold)?;
        non_negative("hit_tolerance", self.hit_tolerance)?;
        non_negative("box_hit_margin", self.box_hit_margin)?;
        unit_range("spline_tension", self.spline_tension)?;
        unit_range("box_default_depth", self.box_default_depth)?;
        unit_range("box_vanishing_point.x", self.box_vanishing_point.x)?;
        unit_range("box_vanishing_point.y", self.box_vanishing_point.y)?;
        if self.spline_samples == 0 {
            return Err(ConfigError::OutOfRange { field: "spline_samples", value: 0.0 });
        }
        Ok(())
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value })
    }
}

fn unit_range(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value })
    }
}
