//! Actuator sinks - where the per-tick control values go
//!
//! A sink consumes one [`ControlFrame`] per tick and applies it to a real or
//! virtual control device. HID emulation lives behind this trait so the
//! pipeline can be exercised without a driver installed; the in-tree
//! [`ConsoleSink`] logs the values instead, which is useful for testing the
//! steering math and for development without hardware dependencies.

use crate::pipeline::ControlFrame;
use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, info};

/// Consumes the steering/throttle/brake tuple once per tick.
#[async_trait]
pub trait ActuatorSink: Send {
    fn name(&self) -> &str;
    async fn init(&mut self) -> Result<()>;
    async fn apply(&mut self, frame: &ControlFrame) -> Result<()>;
    async fn shutdown(&mut self) -> Result<()>;
}

/// Logs every applied frame instead of driving a device.
///
/// Per-tick values go to `debug`; changes in the pedal pair are promoted to
/// `info` so command effects are visible at the default log level.
pub struct ConsoleSink {
    last_pedals: Option<(f32, f32)>,
    tick_count: u64,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self {
            last_pedals: None,
            tick_count: 0,
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ActuatorSink for ConsoleSink {
    fn name(&self) -> &str {
        "console"
    }

    async fn init(&mut self) -> Result<()> {
        info!("🎮 Console sink ready (no virtual device attached)");
        Ok(())
    }

    async fn apply(&mut self, frame: &ControlFrame) -> Result<()> {
        self.tick_count += 1;

        let pedals = (frame.throttle, frame.brake);
        if self.last_pedals != Some(pedals) {
            info!(
                "Pedals changed: throttle={:.1} brake={:.1}",
                frame.throttle, frame.brake
            );
            self.last_pedals = Some(pedals);
        }

        debug!(
            tick = self.tick_count,
            steering = frame.steering,
            throttle = frame.throttle,
            brake = frame.brake,
            "Applied control frame"
        );
        Ok(())
    }

    async fn shutdown(&mut self) -> Result<()> {
        info!("Console sink shut down after {} ticks", self.tick_count);
        Ok(())
    }
}
