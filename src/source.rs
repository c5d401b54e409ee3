//! Hand position source - the input boundary of the pipeline
//!
//! A source delivers one [`HandFrame`] per tick: zero, one, or two wrist
//! positions in normalized image coordinates, each optionally tagged with a
//! left/right label of unknown reliability. Camera capture and landmark
//! inference live outside this process; the in-tree source reads JSON-lines
//! frames from stdin or a replay file, one object per tick:
//!
//! ```text
//! {"hands":[{"x":0.2,"y":0.5,"label":"left"},{"x":0.6,"y":0.5}]}
//! ```
//!
//! End of stream is the terminal condition for the control loop; a malformed
//! line is a degraded reading and is skipped with a warning.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::warn;

/// Which hand a detection claims to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handedness {
    Left,
    Right,
}

/// One wrist detection in `[0,1]` image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RawHand {
    pub x: f32,
    pub y: f32,
    /// Tracker-provided label. Unrecognized labels are treated as absent
    /// rather than rejecting the frame.
    #[serde(default, deserialize_with = "lenient_handedness")]
    pub label: Option<Handedness>,
}

/// All detections for one tick.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HandFrame {
    #[serde(default)]
    pub hands: Vec<RawHand>,
}

fn lenient_handedness<'de, D>(deserializer: D) -> Result<Option<Handedness>, D::Error>
where
    D: Deserializer<'de>,
{
    let label: Option<String> = Option::deserialize(deserializer)?;
    Ok(label.and_then(|s| match s.to_ascii_lowercase().as_str() {
        "left" => Some(Handedness::Left),
        "right" => Some(Handedness::Right),
        _ => None,
    }))
}

/// Supplies hand frames, one per tick.
///
/// The `next_frame` call is the tick boundary: the control loop blocks on it
/// and runs one full pipeline pass per returned frame. `Ok(None)` means the
/// stream ended and the loop should terminate.
#[async_trait]
pub trait HandSource: Send {
    async fn next_frame(&mut self) -> Result<Option<HandFrame>>;
}

/// JSON-lines frame reader over any buffered byte stream.
pub struct JsonlSource<R> {
    reader: R,
    mirror: bool,
    line_no: u64,
}

impl JsonlSource<BufReader<tokio::io::Stdin>> {
    /// Read frames from stdin.
    pub fn stdin(mirror: bool) -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), mirror)
    }
}

impl JsonlSource<BufReader<File>> {
    /// Read frames from a replay file.
    pub async fn open(path: impl AsRef<Path>, mirror: bool) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .await
            .with_context(|| format!("Failed to open frame file: {}", path.display()))?;
        Ok(Self::new(BufReader::new(file), mirror))
    }
}

impl<R: AsyncBufRead + Unpin + Send> JsonlSource<R> {
    pub fn new(reader: R, mirror: bool) -> Self {
        Self {
            reader,
            mirror,
            line_no: 0,
        }
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> HandSource for JsonlSource<R> {
    async fn next_frame(&mut self) -> Result<Option<HandFrame>> {
        loop {
            let mut line = String::new();
            let read = self
                .reader
                .read_line(&mut line)
                .await
                .context("Failed to read frame line")?;
            if read == 0 {
                return Ok(None);
            }
            self.line_no += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            match serde_json::from_str::<HandFrame>(trimmed) {
                Ok(mut frame) => {
                    if self.mirror {
                        for hand in &mut frame.hands {
                            hand.x = 1.0 - hand.x;
                        }
                    }
                    return Ok(Some(frame));
                }
                Err(e) => {
                    warn!("Skipping malformed frame on line {}: {}", self.line_no, e);
                }
            }
        }
    }
}
