//! handwheel - hand-tracked steering for virtual gamepads
//!
//! Reads hand frames (JSON lines) from stdin or a replay file, runs one
//! steering pipeline pass per frame, and applies the resulting control frame
//! to the configured actuator sink. Calibration and pedal commands come from
//! an interactive REPL interleaved with the tick stream.

use anyhow::Result;
use clap::Parser;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use handwheel::cli;
use handwheel::config::AppConfig;
use handwheel::pipeline::{Command, Pipeline};
use handwheel::sink::{ActuatorSink, ConsoleSink};
use handwheel::source::{HandFrame, HandSource, JsonlSource};

/// Handwheel - drive a virtual gamepad with tracked hand positions
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Hand frame input: a JSONL file path, or '-' for stdin
    #[arg(short, long, default_value = "-")]
    input: String,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Disable the interactive command REPL (frames only)
    #[arg(long)]
    no_repl: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_logging(&args.log_level)?;

    info!("Starting handwheel...");
    info!("Configuration file: {}", args.config);

    let config = AppConfig::load_or_default(&args.config).await?;

    let source: Box<dyn HandSource> = if args.input == "-" {
        info!("Reading hand frames from stdin");
        Box::new(JsonlSource::stdin(config.source.mirror))
    } else {
        info!("Reading hand frames from {}", args.input);
        Box::new(JsonlSource::open(&args.input, config.source.mirror).await?)
    };

    let pipeline = Pipeline::new(config.control.clone());
    let mut sink = ConsoleSink::new();
    sink.init().await?;

    run_loop(pipeline, source, &mut sink, !args.no_repl).await?;

    sink.shutdown().await?;
    info!("handwheel shutdown complete");
    Ok(())
}

/// The control loop: one pipeline pass per frame, commands interleaved.
async fn run_loop(
    mut pipeline: Pipeline,
    mut source: Box<dyn HandSource>,
    sink: &mut dyn ActuatorSink,
    with_repl: bool,
) -> Result<()> {
    // Frame reader task; channel closure is the terminal condition.
    let (frame_tx, mut frame_rx) = mpsc::channel::<HandFrame>(16);
    let reader = tokio::spawn(async move {
        loop {
            match source.next_frame().await {
                Ok(Some(frame)) => {
                    if frame_tx.send(frame).await.is_err() {
                        break;
                    }
                }
                Ok(None) => {
                    info!("Hand frame stream ended");
                    break;
                }
                Err(e) => {
                    warn!("Hand source failed: {:#}", e);
                    break;
                }
            }
        }
    });

    let (command_tx, mut command_rx) = mpsc::channel::<Command>(16);
    if with_repl {
        std::thread::spawn(move || cli::run_repl(command_tx));
    }

    info!("Ready to process hand frames");

    loop {
        tokio::select! {
            frame = frame_rx.recv() => {
                let Some(frame) = frame else {
                    // Source is gone; nothing more to drive.
                    break;
                };
                let out = pipeline.tick(Instant::now(), &frame);
                sink.apply(&out).await?;
            }

            Some(command) = command_rx.recv() => {
                match command {
                    Command::Quit => {
                        info!("Quit requested");
                        break;
                    }
                    Command::Status => {
                        let status = pipeline.status(Instant::now());
                        let calibration = match (status.countdown_remaining, status.offset_deg) {
                            (Some(remaining), _) => {
                                format!("calibrating ({:.1}s left)", remaining.as_secs_f32())
                            }
                            (None, Some(offset)) => format!("offset {:.2}°", offset),
                            (None, None) => "uncalibrated".to_string(),
                        };
                        info!(
                            "Status: tracking={} {} steering={:.3} throttle={:.1} brake={:.1}",
                            status.tracking,
                            calibration,
                            status.steering,
                            status.throttle,
                            status.brake,
                        );
                    }
                    other => pipeline.handle_command(Instant::now(), other),
                }
            }

            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received, stopping control loop");
                break;
            }
        }
    }

    reader.abort();
    Ok(())
}

fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false),
        )
        .init();

    Ok(())
}
