//! Integration test: homing on the simulated bench.
//!
//! Validates: direction mapping, stop-on-first-trigger, wiring checks,
//! step ceiling, and that homing without a ceiling does not return while
//! its sensor is dead.

use super::{bench, bench_with};
use gantry_common::hal::config::HalConfig;
use gantry_common::hal::types::Level;
use gantry_common::motion::{AxisId, Direction, SensorId};
use gantry_hal::drivers::simulation::BenchEvent;
use gantry_motion::{HomingState, MotionError};
use proptest::prelude::*;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

#[test]
fn test_home_min_drives_negative_until_trigger() {
    let mut b = bench();
    let pins = b.sim.pins();
    b.sim.set_position(AxisId::X, 37);
    b.sim.start_recording();

    let report = b
        .gantry
        .home(AxisId::X, Direction::Negative, SensorId::X_MIN)
        .expect("home");

    assert_eq!(report.steps, 37);
    assert_eq!(report.sensor, SensorId::X_MIN);
    assert_eq!(b.sim.position(AxisId::X), 0);
    assert_eq!(b.gantry.homing_state(), HomingState::Reached);

    let events = b.sim.take_events();
    assert_eq!(
        events[0],
        BenchEvent::Output {
            pin: pins.x_dir,
            level: Level::Low
        }
    );
    // direction set once, then 37 high/low pairs
    assert_eq!(events.len(), 1 + 2 * 37);
}

#[test]
fn test_home_max_drives_positive() {
    let mut b = bench();
    let pins = b.sim.pins();
    b.sim.start_recording();

    let report = b
        .gantry
        .home(AxisId::Y, Direction::Positive, SensorId::Y_MAX)
        .expect("home");

    assert_eq!(report.steps, 200);
    assert_eq!(b.sim.position(AxisId::Y), b.sim.travel(AxisId::Y));
    assert_eq!(
        b.sim.take_events()[0],
        BenchEvent::Output {
            pin: pins.y_dir,
            level: Level::High
        }
    );
}

#[test]
fn test_already_at_limit_takes_no_steps() {
    let mut b = bench();
    b.sim.set_position(AxisId::Y, 0);
    let report = b
        .gantry
        .home(AxisId::Y, Direction::Negative, SensorId::Y_MIN)
        .expect("home");
    assert_eq!(report.steps, 0);
    assert_eq!(b.gantry.axis(AxisId::Y).pulses_issued(), 0);
}

#[test]
fn test_mismatched_sensor_rejected_before_motion() {
    let mut b = bench();
    b.sim.start_recording();

    let wrong_end = b
        .gantry
        .home(AxisId::X, Direction::Positive, SensorId::X_MIN);
    assert!(matches!(wrong_end, Err(MotionError::SensorMismatch { .. })));

    let wrong_axis = b
        .gantry
        .home(AxisId::X, Direction::Negative, SensorId::Y_MIN);
    assert_eq!(
        wrong_axis,
        Err(MotionError::SensorMismatch {
            axis: AxisId::X,
            direction: Direction::Negative,
            sensor: SensorId::Y_MIN,
        })
    );

    assert!(b.sim.take_events().is_empty());
    assert_eq!(b.sim.position(AxisId::X), 200);
}

#[test]
fn test_step_ceiling_aborts() {
    let mut b = bench_with(HalConfig::default(), 50);
    b.sim.disconnect_sensor(SensorId::X_MIN);

    let result = b
        .gantry
        .home(AxisId::X, Direction::Negative, SensorId::X_MIN);

    assert_eq!(
        result,
        Err(MotionError::StepLimitExceeded {
            sensor: SensorId::X_MIN,
            steps: 50
        })
    );
    assert_eq!(b.gantry.homing_state(), HomingState::Aborted);
    assert_eq!(b.sim.position(AxisId::X), 150);
}

#[test]
fn test_dead_sensor_without_ceiling_does_not_return() {
    let mut b = bench_with(HalConfig::default(), 0);
    let sim = b.sim.clone();
    sim.disconnect_sensor(SensorId::X_MIN);

    let (tx, rx) = mpsc::channel();
    let worker = thread::spawn(move || {
        let result = b.gantry.home(AxisId::X, Direction::Negative, SensorId::X_MIN);
        let _ = tx.send(());
        (result, b)
    });

    assert_eq!(
        rx.recv_timeout(Duration::from_millis(300)),
        Err(mpsc::RecvTimeoutError::Timeout)
    );
    // carriage pinned at the end stop, still pulsing
    assert_eq!(sim.position(AxisId::X), 0);
    assert!(sim.steps_taken(AxisId::X) > 200);

    sim.reconnect_sensor(SensorId::X_MIN);
    let (result, _bench) = worker.join().expect("worker");
    assert_eq!(result.expect("home").sensor, SensorId::X_MIN);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_homing_terminates_at_sensor(
        travel_x in 1u32..300,
        travel_y in 1u32..300,
        start_x_frac in 0.0f64..=1.0,
        start_y_frac in 0.0f64..=1.0,
    ) {
        let start_x = (travel_x as f64 * start_x_frac) as u32;
        let start_y = (travel_y as f64 * start_y_frac) as u32;
        let mut config = HalConfig::default();
        config.simulation.travel_x_steps = travel_x;
        config.simulation.travel_y_steps = travel_y;
        config.simulation.start_x_steps = start_x;
        config.simulation.start_y_steps = start_y;
        let mut b = bench_with(config, 1_000);

        let x = b.gantry.home(AxisId::X, Direction::Positive, SensorId::X_MAX).unwrap();
        prop_assert_eq!(x.steps, u64::from(travel_x - start_x));
        prop_assert!(b.gantry.sensors().get(SensorId::X_MAX).at_limit());

        let y = b.gantry.home(AxisId::Y, Direction::Negative, SensorId::Y_MIN).unwrap();
        prop_assert_eq!(y.steps, u64::from(start_y));
        prop_assert!(b.gantry.sensors().get(SensorId::Y_MIN).at_limit());

        let x = b.gantry.home(AxisId::X, Direction::Negative, SensorId::X_MIN).unwrap();
        prop_assert_eq!(x.steps, u64::from(travel_x));
        prop_assert_eq!(b.sim.position(AxisId::X), 0);
    }
}
