//! handwheel - hand-tracked steering for virtual gamepads
//!
//! Turns two tracked wrist positions per video frame into a continuous
//! steering value plus discrete throttle/brake values. The crate is the
//! steering control pipeline only: hand landmark inference sits upstream
//! (delivering JSON-lines frames) and HID emulation sits downstream behind
//! the [`sink::ActuatorSink`] trait.

pub mod cli;
pub mod config;
pub mod pipeline;
pub mod sink;
pub mod source;

pub use config::{AppConfig, ControlConfig};
pub use pipeline::{Command, ControlFrame, Pipeline, PipelineStatus};
pub use sink::{ActuatorSink, ConsoleSink};
pub use source::{HandFrame, HandSource, Handedness, JsonlSource, RawHand};
