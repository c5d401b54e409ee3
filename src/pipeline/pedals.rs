//! Pedal state - command-driven throttle and brake
//!
//! Pedals are not derived from hand tracking; there is no pedal sensor in
//! this system. Each command sets the opposing pair atomically and the values
//! persist until the next command. No smoothing, no decay.

/// Throttle and brake values in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PedalState {
    throttle: f32,
    brake: f32,
}

impl PedalState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn throttle(&self) -> f32 {
        self.throttle
    }

    pub fn brake(&self) -> f32 {
        self.brake
    }

    /// Full throttle, brake released.
    pub fn accelerate(&mut self) {
        self.throttle = 1.0;
        self.brake = 0.0;
    }

    /// Full brake, throttle released.
    pub fn brake_full(&mut self) {
        self.throttle = 0.0;
        self.brake = 1.0;
    }
}
