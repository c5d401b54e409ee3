//! End-to-end scenario tests for the Pipeline

use super::*;
use crate::source::{HandFrame, Handedness, RawHand};
use std::time::{Duration, Instant};

fn frame(hands: &[(f32, f32)]) -> HandFrame {
    HandFrame {
        hands: hands
            .iter()
            .map(|&(x, y)| RawHand { x, y, label: None })
            .collect(),
    }
}

fn single(x: f32, y: f32, label: Option<Handedness>) -> HandFrame {
    HandFrame {
        hands: vec![RawHand { x, y, label }],
    }
}

fn pipeline() -> Pipeline {
    Pipeline::new(ControlConfig::default())
}

#[test]
fn test_level_pose_stays_centered() {
    let mut pipeline = pipeline();
    let now = Instant::now();

    // left=(0.2,0.5) right=(0.6,0.5) -> 0 degrees, inside the deadzone.
    let out = pipeline.tick(now, &frame(&[(0.2, 0.5), (0.6, 0.5)]));
    assert_eq!(out.steering, 0.0);
    assert_eq!(out.throttle, 0.0);
    assert_eq!(out.brake, 0.0);
}

#[test]
fn test_tilted_pose_steers_left() {
    let mut pipeline = pipeline();
    let now = Instant::now();

    // dx=0.4 dy=-0.2 -> ~-26.57 degrees -> normalized ~-0.590.
    let out = pipeline.tick(now, &frame(&[(0.2, 0.6), (0.6, 0.4)]));
    // One EMA step from rest: 0.2 * -0.590.
    assert!((out.steering - 0.2 * -0.5903).abs() < 1e-3, "got {}", out.steering);
}

#[test]
fn test_four_tick_ramp() {
    let mut pipeline = pipeline();
    let now = Instant::now();

    // Full-lock pose: 45 degrees maps to normalized 1.0.
    let full_lock = frame(&[(0.2, 0.2), (0.6, 0.6)]);

    let out = pipeline.tick(now, &full_lock);
    assert!((out.steering - 0.2).abs() < 1e-5);

    let mut last = out.steering;
    for _ in 0..3 {
        last = pipeline.tick(now, &full_lock).steering;
    }
    // 1 - 0.8^4 = 0.5904
    assert!((last - 0.5904).abs() < 1e-4, "got {last}");
}

#[test]
fn test_hands_lost_decays_to_center() {
    let mut pipeline = pipeline();
    let now = Instant::now();
    let full_lock = frame(&[(0.2, 0.2), (0.6, 0.6)]);

    for _ in 0..50 {
        pipeline.tick(now, &full_lock);
    }
    let held = pipeline.status(now).steering;
    assert!(held > 0.9);

    let mut value = held;
    for n in 1..=5 {
        value = pipeline.tick(now, &frame(&[])).steering;
        let expected = held * 0.8f32.powi(n);
        assert!((value - expected).abs() < 1e-4, "tick {n}: {value} vs {expected}");
    }

    // Decay reaches the snap threshold and lands on exactly zero.
    for _ in 0..40 {
        value = pipeline.tick(now, &frame(&[])).steering;
    }
    assert_eq!(value, 0.0);
}

#[test]
fn test_single_labeled_hand_is_not_a_pair() {
    let mut pipeline = pipeline();
    let now = Instant::now();
    let full_lock = frame(&[(0.2, 0.2), (0.6, 0.6)]);

    pipeline.tick(now, &full_lock);
    let before = pipeline.status(now).steering;
    assert!(before > 0.0);

    // One hand, even correctly labeled, cannot produce an angle; the output
    // decays as if tracking was lost.
    let out = pipeline.tick(now, &single(0.2, 0.2, Some(Handedness::Left)));
    assert!((out.steering - before * 0.8).abs() < 1e-6);
}

#[test]
fn test_calibration_zeroes_steady_pose() {
    let mut pipeline = pipeline();
    let start = Instant::now();
    let tilted = frame(&[(0.2, 0.6), (0.6, 0.4)]);

    // Hold a tilted pose, then calibrate it as the new center.
    pipeline.tick(start, &tilted);
    pipeline.handle_command(start, Command::Calibrate);
    assert!(pipeline.status(start).countdown_remaining.is_some());

    let expiry = start + Duration::from_secs(3);
    pipeline.tick(expiry, &tilted);

    let status = pipeline.status(expiry);
    let offset = status.offset_deg.expect("offset should be set");
    assert!((offset - (-26.565)).abs() < 0.01, "offset {offset}");

    // The identical pose now normalizes to zero; smoothing drains the
    // pre-calibration residue toward center.
    for _ in 0..60 {
        pipeline.tick(expiry, &tilted);
    }
    assert!(pipeline.status(expiry).steering.abs() < 1e-4);
}

#[test]
fn test_calibration_is_idempotent_under_no_motion() {
    let mut pipeline = pipeline();
    let mut now = Instant::now();
    let tilted = frame(&[(0.2, 0.6), (0.6, 0.4)]);

    for _ in 0..2 {
        pipeline.handle_command(now, Command::Calibrate);
        now += Duration::from_secs(3);
        pipeline.tick(now, &tilted);
    }

    let status = pipeline.status(now);
    let offset = status.offset_deg.expect("offset should be set");
    assert!((offset - (-26.565)).abs() < 0.01);

    for _ in 0..60 {
        pipeline.tick(now, &tilted);
    }
    assert!(pipeline.status(now).steering.abs() < 1e-4);
}

#[test]
fn test_calibration_restart_replaces_countdown() {
    let mut pipeline = pipeline();
    let start = Instant::now();
    let tilted = frame(&[(0.2, 0.6), (0.6, 0.4)]);

    pipeline.handle_command(start, Command::Calibrate);
    // Re-issue two seconds in; the original deadline must not fire.
    pipeline.handle_command(start + Duration::from_secs(2), Command::Calibrate);

    pipeline.tick(start + Duration::from_secs(3), &tilted);
    assert_eq!(pipeline.status(start + Duration::from_secs(3)).offset_deg, None);

    pipeline.tick(start + Duration::from_secs(5), &tilted);
    assert!(pipeline
        .status(start + Duration::from_secs(5))
        .offset_deg
        .is_some());
}

#[test]
fn test_calibration_uses_last_known_angle_when_hands_lost() {
    let mut pipeline = pipeline();
    let start = Instant::now();

    // A valid reading happened earlier; hands are gone at expiry.
    pipeline.tick(start, &frame(&[(0.2, 0.6), (0.6, 0.4)]));
    pipeline.handle_command(start, Command::Calibrate);
    pipeline.tick(start + Duration::from_secs(3), &frame(&[]));

    let offset = pipeline
        .status(start + Duration::from_secs(3))
        .offset_deg
        .expect("last known angle should be captured");
    assert!((offset - (-26.565)).abs() < 0.01);
}

#[test]
fn test_calibration_fails_without_any_reading() {
    let mut pipeline = pipeline();
    let start = Instant::now();

    pipeline.handle_command(start, Command::Calibrate);
    pipeline.tick(start + Duration::from_secs(3), &frame(&[]));

    let status = pipeline.status(start + Duration::from_secs(3));
    assert_eq!(status.offset_deg, None, "failed calibration must not set an offset");
    assert_eq!(status.countdown_remaining, None, "countdown must fold back to idle");
}

#[test]
fn test_pedal_commands_persist_across_ticks() {
    let mut pipeline = pipeline();
    let now = Instant::now();

    pipeline.handle_command(now, Command::Accelerate);
    let out = pipeline.tick(now, &frame(&[]));
    assert_eq!((out.throttle, out.brake), (1.0, 0.0));

    // Persist with no further commands.
    let out = pipeline.tick(now, &frame(&[(0.2, 0.5), (0.6, 0.5)]));
    assert_eq!((out.throttle, out.brake), (1.0, 0.0));

    pipeline.handle_command(now, Command::Brake);
    let out = pipeline.tick(now, &frame(&[]));
    assert_eq!((out.throttle, out.brake), (0.0, 1.0));
}

#[test]
fn test_raw_angle_survives_tracking_gaps() {
    let mut pipeline = pipeline();
    let start = Instant::now();

    pipeline.tick(start, &frame(&[(0.2, 0.6), (0.6, 0.4)]));

    // A long gap with no hands, then a calibration that still resolves to
    // the pre-gap angle.
    for _ in 0..100 {
        pipeline.tick(start, &frame(&[]));
    }
    pipeline.handle_command(start, Command::Calibrate);
    pipeline.tick(start + Duration::from_secs(3), &frame(&[]));

    let offset = pipeline
        .status(start + Duration::from_secs(3))
        .offset_deg
        .expect("angle should survive the gap");
    assert!((offset - (-26.565)).abs() < 0.01);
}
