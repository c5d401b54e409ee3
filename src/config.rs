//! Configuration management
//!
//! Loads the YAML configuration file. Every tunable has a default, so a
//! missing file or an empty `control:` section still yields a working setup;
//! validation catches values that would break the steering math (the maximum
//! steer angle is a divisor and must stay positive).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tokio::fs;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub control: ControlConfig,
    #[serde(default)]
    pub source: SourceConfig,
}

/// Steering pipeline tunables
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ControlConfig {
    /// Hand angle (degrees) that maps to full steering lock.
    #[serde(default = "default_max_steer_angle")]
    pub max_steer_angle_deg: f32,
    /// EMA weight of each fresh reading; higher = more responsive.
    #[serde(default = "default_smoothing_factor")]
    pub smoothing_factor: f32,
    /// Normalized band around center forced to exactly zero.
    #[serde(default = "default_deadzone")]
    pub deadzone: f32,
    /// Countdown length for the calibration pose capture.
    #[serde(default = "default_calibration_secs")]
    pub calibration_secs: f32,
    /// Per-tick multiplier applied while hand tracking is lost.
    #[serde(default = "default_auto_center_decay")]
    pub auto_center_decay: f32,
    /// Below this magnitude the decaying output snaps to exactly zero.
    #[serde(default = "default_auto_center_snap")]
    pub auto_center_snap_threshold: f32,
}

/// Hand source options
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SourceConfig {
    /// Flip x coordinates on ingest, for sources that do not pre-mirror the
    /// camera image.
    #[serde(default)]
    pub mirror: bool,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("max_steer_angle_deg must be positive, got {0}")]
    NonPositiveMaxAngle(f32),
    #[error("smoothing_factor must be in (0, 1], got {0}")]
    SmoothingOutOfRange(f32),
    #[error("deadzone must be in [0, 1), got {0}")]
    DeadzoneOutOfRange(f32),
    #[error("calibration_secs must be positive, got {0}")]
    NonPositiveCalibration(f32),
    #[error("auto_center_decay must be in [0, 1), got {0}")]
    DecayOutOfRange(f32),
    #[error("auto_center_snap_threshold must be non-negative, got {0}")]
    NegativeSnapThreshold(f32),
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            max_steer_angle_deg: default_max_steer_angle(),
            smoothing_factor: default_smoothing_factor(),
            deadzone: default_deadzone(),
            calibration_secs: default_calibration_secs(),
            auto_center_decay: default_auto_center_decay(),
            auto_center_snap_threshold: default_auto_center_snap(),
        }
    }
}

impl ControlConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.max_steer_angle_deg > 0.0) {
            return Err(ConfigError::NonPositiveMaxAngle(self.max_steer_angle_deg));
        }
        if !(self.smoothing_factor > 0.0 && self.smoothing_factor <= 1.0) {
            return Err(ConfigError::SmoothingOutOfRange(self.smoothing_factor));
        }
        if !(self.deadzone >= 0.0 && self.deadzone < 1.0) {
            return Err(ConfigError::DeadzoneOutOfRange(self.deadzone));
        }
        if !(self.calibration_secs > 0.0) {
            return Err(ConfigError::NonPositiveCalibration(self.calibration_secs));
        }
        if !(self.auto_center_decay >= 0.0 && self.auto_center_decay < 1.0) {
            return Err(ConfigError::DecayOutOfRange(self.auto_center_decay));
        }
        if !(self.auto_center_snap_threshold >= 0.0) {
            return Err(ConfigError::NegativeSnapThreshold(
                self.auto_center_snap_threshold,
            ));
        }
        Ok(())
    }

    pub fn calibration_duration(&self) -> Duration {
        Duration::from_secs_f32(self.calibration_secs)
    }
}

impl AppConfig {
    /// Load configuration from file
    pub async fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: AppConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse YAML config: {}", path))?;

        config.control.validate()?;
        Ok(config)
    }

    /// Load the config file if it exists, otherwise fall back to defaults.
    pub async fn load_or_default(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            Self::load(path).await
        } else {
            tracing::info!("No config file at {}, using defaults", path);
            Ok(Self::default())
        }
    }
}

// Default value functions
fn default_max_steer_angle() -> f32 {
    45.0
}
fn default_smoothing_factor() -> f32 {
    0.2
}
fn default_deadzone() -> f32 {
    0.05
}
fn default_calibration_secs() -> f32 {
    3.0
}
fn default_auto_center_decay() -> f32 {
    0.8
}
fn default_auto_center_snap() -> f32 {
    0.01
}
