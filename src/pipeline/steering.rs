//! Steering math - angle estimation, normalization, and temporal smoothing
//!
//! The raw steering angle is the angle of the vector from the left to the
//! right wrist against the horizontal axis. It is calibrated by subtracting a
//! captured offset, wrapped back into `(-180, 180]`, scaled by the maximum
//! steer angle, clamped, deadzoned, and finally run through an exponential
//! moving average. When tracking is lost the filter switches to a decay mode
//! that returns the output to center within a bounded number of ticks instead
//! of holding a stale value.

use crate::config::ControlConfig;
use crate::pipeline::assign::AssignedHands;

/// Compute the raw steering angle in degrees from an assigned pair.
///
/// Returns `None` unless both hands are present. `atan2` keeps the result in
/// `(-180, 180]`; callers must not overwrite their stored last-known angle on
/// a `None` result, since calibration reads that value.
pub fn estimate_angle(hands: &AssignedHands) -> Option<f32> {
    let (left, right) = match (&hands.left, &hands.right) {
        (Some(l), Some(r)) => (l, r),
        _ => return None,
    };

    let dx = right.x - left.x;
    let dy = right.y - left.y;
    Some(dy.atan2(dx).to_degrees())
}

/// Wrap an angle delta back into `(-180, 180]`.
///
/// A single correction step is enough: both operands of the subtraction are
/// already in `(-180, 180]`, which bounds the delta to `(-360, 360)`.
pub fn wrap_delta_deg(mut delta: f32) -> f32 {
    if delta > 180.0 {
        delta -= 360.0;
    }
    if delta < -180.0 {
        delta += 360.0;
    }
    delta
}

/// Map a calibrated angle to a steering value in `[-1, 1]`.
///
/// Subtracts the calibration offset (0 when uncalibrated), wraps, scales by
/// `max_steer_angle_deg`, clamps, and forces values inside the deadzone to
/// exactly 0 to suppress tracking jitter at rest.
pub fn normalize_angle(raw_angle_deg: f32, offset_deg: Option<f32>, config: &ControlConfig) -> f32 {
    let delta = wrap_delta_deg(raw_angle_deg - offset_deg.unwrap_or(0.0));

    let normalized = (delta / config.max_steer_angle_deg).clamp(-1.0, 1.0);
    if normalized.abs() < config.deadzone {
        0.0
    } else {
        normalized
    }
}

/// Exponential smoothing filter with auto-centering.
///
/// Holds the IIR state that persists across ticks. `update` is for ticks with
/// a fresh two-hand reading; `decay` is for ticks where tracking is lost.
#[derive(Debug, Clone, Copy, Default)]
pub struct SteeringFilter {
    smoothed: f32,
}

impl SteeringFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current filter output in `[-1, 1]`.
    pub fn value(&self) -> f32 {
        self.smoothed
    }

    /// Blend a fresh normalized value into the filter state.
    ///
    /// `smoothing_factor` is the EMA weight of the new sample: higher is more
    /// responsive, lower is smoother.
    pub fn update(&mut self, normalized: f32, config: &ControlConfig) -> f32 {
        let alpha = config.smoothing_factor;
        self.smoothed = alpha * normalized + (1.0 - alpha) * self.smoothed;
        self.smoothed
    }

    /// Hands-lost tick: decay toward center, snapping to exactly 0 near it.
    pub fn decay(&mut self, config: &ControlConfig) -> f32 {
        self.smoothed *= config.auto_center_decay;
        if self.smoothed.abs() < config.auto_center_snap_threshold {
            self.smoothed = 0.0;
        }
        self.smoothed
    }
}
