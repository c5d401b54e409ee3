//! Calibration countdown state machine
//!
//! Capturing the "wheel centered" pose: a calibrate command arms a countdown,
//! and when it expires the last valid steering angle becomes the calibration
//! offset. Expiry is detected by comparing a stored deadline against the
//! current tick's wall-clock time, so there is no timer task and no
//! cancellation token; completion latency is bounded by the tick period.
//! Re-issuing the command while counting down restarts the deadline rather
//! than stacking a second countdown.

use std::time::{Duration, Instant};

/// Countdown state. `Idle` between calibrations; completion folds back to
/// `Idle` on the tick that observes the expired deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    CountingDown { deadline: Instant },
}

/// Per-tick outcome of the state machine, for logging and display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CalibrationOutcome {
    /// No calibration in progress.
    Inactive,
    /// Counting down; `remaining` is for display only.
    Pending { remaining: Duration },
    /// Countdown expired with a valid angle; this value is the new offset.
    Calibrated { offset_deg: f32 },
    /// Countdown expired but no valid two-hand reading has ever been seen.
    /// The existing offset (or lack of one) is preserved.
    Failed,
}

#[derive(Debug, Clone, Copy)]
pub struct CalibrationSession {
    state: State,
    duration: Duration,
}

impl CalibrationSession {
    pub fn new(duration: Duration) -> Self {
        Self {
            state: State::Idle,
            duration,
        }
    }

    /// Arm (or restart) the countdown, expiring `duration` from `now`.
    pub fn start(&mut self, now: Instant) {
        self.state = State::CountingDown {
            deadline: now + self.duration,
        };
    }

    pub fn is_counting_down(&self) -> bool {
        matches!(self.state, State::CountingDown { .. })
    }

    /// Time left before expiry, without advancing the machine.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        match self.state {
            State::CountingDown { deadline } if now < deadline => Some(deadline - now),
            _ => None,
        }
    }

    /// Poll the countdown against the current tick time.
    ///
    /// `last_raw_angle_deg` is the most recent valid steering angle, if any
    /// two-hand reading has occurred; on expiry it becomes the offset. The
    /// caller applies `Calibrated` outcomes to its own steering state - this
    /// machine only reports them.
    pub fn tick(&mut self, now: Instant, last_raw_angle_deg: Option<f32>) -> CalibrationOutcome {
        let deadline = match self.state {
            State::Idle => return CalibrationOutcome::Inactive,
            State::CountingDown { deadline } => deadline,
        };

        if now < deadline {
            return CalibrationOutcome::Pending {
                remaining: deadline - now,
            };
        }

        self.state = State::Idle;
        match last_raw_angle_deg {
            Some(offset_deg) => CalibrationOutcome::Calibrated { offset_deg },
            None => CalibrationOutcome::Failed,
        }
    }
}
