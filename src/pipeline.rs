//! Steering control pipeline
//!
//! One [`Pipeline::tick`] call per incoming hand frame runs the full pass:
//! hand assignment, angle estimation, calibration polling, normalization, and
//! smoothing, then returns the control frame for the actuator sink. Commands
//! (calibrate, pedals) arrive between ticks through [`Pipeline::handle_command`].
//!
//! All state lives in the one `Pipeline` value owned by the control loop; the
//! algorithms assume exclusive, serialized access. Embedding this in a
//! multi-threaded host requires a single mutex around the whole pipeline or a
//! single-consumer command queue, never per-field sharing.

pub mod assign;
pub mod calibration;
pub mod pedals;
pub mod steering;

#[cfg(test)]
mod tests;

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::ControlConfig;
use crate::source::HandFrame;
use assign::assign_hands;
use calibration::{CalibrationOutcome, CalibrationSession};
use pedals::PedalState;
use steering::{estimate_angle, normalize_angle, SteeringFilter};

/// External commands interleaved with ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Start (or restart) the calibration countdown.
    Calibrate,
    /// Full throttle, brake released.
    Accelerate,
    /// Full brake, throttle released.
    Brake,
    /// Log a status snapshot.
    Status,
    /// Terminate the control loop. Handled by the loop, not the pipeline.
    Quit,
}

/// Per-tick output delivered to the actuator sink.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlFrame {
    /// Steering in `[-1, 1]`, negative = left.
    pub steering: f32,
    /// Throttle in `[0, 1]`.
    pub throttle: f32,
    /// Brake in `[0, 1]`.
    pub brake: f32,
}

/// Snapshot of the pipeline for display.
///
/// `offset_deg` distinguishes "uncalibrated" (`None`) from "calibrated to
/// zero" (`Some(0.0)`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineStatus {
    pub tracking: bool,
    pub offset_deg: Option<f32>,
    pub countdown_remaining: Option<Duration>,
    /// Deadzoned, calibration-corrected value before smoothing.
    pub normalized: f32,
    /// Smoothed output actually driven to the sink.
    pub steering: f32,
    pub throttle: f32,
    pub brake: f32,
}

/// Steering values carried across ticks.
#[derive(Debug, Clone, Copy, Default)]
struct SteeringState {
    /// Last angle from a valid two-hand reading. Written only by such a
    /// reading, never cleared; calibration snapshots it on expiry.
    raw_angle_deg: Option<f32>,
    /// `None` until a calibration succeeds. Treated as 0 for output.
    calibration_offset_deg: Option<f32>,
    /// Deadzoned, calibration-corrected value before smoothing.
    normalized_value: f32,
}

/// The steering control pipeline. Owns all mutable state of the control loop.
pub struct Pipeline {
    config: ControlConfig,
    steering: SteeringState,
    filter: SteeringFilter,
    calibration: CalibrationSession,
    pedals: PedalState,
    tracking: bool,
}

impl Pipeline {
    pub fn new(config: ControlConfig) -> Self {
        Self {
            calibration: CalibrationSession::new(config.calibration_duration()),
            config,
            steering: SteeringState::default(),
            filter: SteeringFilter::new(),
            pedals: PedalState::new(),
            tracking: false,
        }
    }

    /// Run one full pipeline pass for a hand frame.
    ///
    /// Always produces a control frame; on hands-lost ticks the steering
    /// output decays toward center instead of holding the last value.
    pub fn tick(&mut self, now: Instant, frame: &HandFrame) -> ControlFrame {
        let assigned = assign_hands(&frame.hands);
        let fresh_angle = estimate_angle(&assigned);
        self.tracking = fresh_angle.is_some();

        // A failed reading must not clear the last known good angle.
        if let Some(angle) = fresh_angle {
            self.steering.raw_angle_deg = Some(angle);
        }

        match self.calibration.tick(now, self.steering.raw_angle_deg) {
            CalibrationOutcome::Inactive => {}
            CalibrationOutcome::Pending { remaining } => {
                debug!("Calibration in {:.1}s, hold the wheel centered", remaining.as_secs_f32());
            }
            CalibrationOutcome::Calibrated { offset_deg } => {
                self.steering.calibration_offset_deg = Some(offset_deg);
                info!("🎯 Calibrated! Offset: {:.2}°", offset_deg);
            }
            CalibrationOutcome::Failed => {
                warn!("Calibration expired without a valid hand reading, offset unchanged");
            }
        }

        let steering = match fresh_angle {
            Some(angle) => {
                let normalized =
                    normalize_angle(angle, self.steering.calibration_offset_deg, &self.config);
                self.steering.normalized_value = normalized;
                self.filter.update(normalized, &self.config)
            }
            None => self.filter.decay(&self.config),
        };

        ControlFrame {
            steering,
            throttle: self.pedals.throttle(),
            brake: self.pedals.brake(),
        }
    }

    /// Apply a discrete command between ticks.
    pub fn handle_command(&mut self, now: Instant, command: Command) {
        match command {
            Command::Calibrate => {
                info!(
                    "Calibration starting, hold the wheel centered for {:.0}s...",
                    self.config.calibration_secs
                );
                self.calibration.start(now);
            }
            Command::Accelerate => {
                self.pedals.accelerate();
                info!("ACCEL");
            }
            Command::Brake => {
                self.pedals.brake_full();
                info!("BRAKE");
            }
            Command::Status | Command::Quit => {}
        }
    }

    /// Snapshot for the REPL `status` command and other display layers.
    ///
    /// Read-only: does not advance the calibration machine.
    pub fn status(&self, now: Instant) -> PipelineStatus {
        PipelineStatus {
            countdown_remaining: self.calibration.remaining(now),
            tracking: self.tracking,
            offset_deg: self.steering.calibration_offset_deg,
            normalized: self.steering.normalized_value,
            steering: self.filter.value(),
            throttle: self.pedals.throttle(),
            brake: self.pedals.brake(),
        }
    }
}
