use crate::EditorError;
use roughrefine_geometry::SnapSettings;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Editor settings, read from JSON with every field optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Quiet period before a text edit is synced to the canvas
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Maximum number of undo levels (0 = unlimited)
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Snap distance in screen pixels
    #[serde(default = "default_snap_threshold")]
    pub snap_threshold: f64,

    #[serde(default = "default_angle_step")]
    pub angle_step_degrees: f64,

    #[serde(default = "default_min_scale")]
    pub min_scale: f64,
}

fn default_debounce_ms() -> u64 {
    160
}

fn default_history_limit() -> usize {
    100
}

fn default_snap_threshold() -> f64 {
    SnapSettings::default().base_threshold
}

fn default_angle_step() -> f64 {
    SnapSettings::default().angle_step_degrees
}

fn default_min_scale() -> f64 {
    SnapSettings::default().min_scale
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the transform math cannot use.
    pub fn validate(&self) -> Result<(), EditorError> {
        let positive = [
            ("angleStepDegrees", self.angle_step_degrees),
            ("minScale", self.min_scale),
        ];
        let invalid = positive
            .into_iter()
            .find(|(_, value)| !(value.is_finite() && *value > 0.0));
        if let Some((name, value)) = invalid {
            return Err(EditorError::InvalidConfig(format!(
                "{} must be a positive number, got {}",
                name, value
            )));
        }
        if !(self.snap_threshold.is_finite() && self.snap_threshold >= 0.0) {
            return Err(EditorError::InvalidConfig(format!(
                "snapThreshold must not be negative, got {}",
                self.snap_threshold
            )));
        }
        Ok(())
    }

    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn snap_settings(&self) -> SnapSettings {
        SnapSettings {
            base_threshold: self.snap_threshold,
            angle_step_degrees: self.angle_step_degrees,
            min_scale: self.min_scale,
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            history_limit: default_history_limit(),
            snap_threshold: default_snap_threshold(),
            angle_step_degrees: default_angle_step(),
            min_scale: default_min_scale(),
        }
    }
}
