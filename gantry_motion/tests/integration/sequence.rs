//! Integration test: four-position sequencing.
//!
//! Validates: X-before-Y ordering, the P1..P4,P1 run from any start,
//! tagged captures, and capture-failure handling per policy.

use super::{Bench, StubCamera, bench};
use gantry_common::hal::types::Level;
use gantry_common::motion::{AxisId, CaptureFailurePolicy, SensorId};
use gantry_hal::HalCore;
use gantry_hal::drivers::simulation::{BenchEvent, SimHandle};
use gantry_motion::{
    CaptureError, FULL_SEQUENCE, HomingState, Position, PositionSequencer, SequenceError,
};

fn sequencer(policy: CaptureFailurePolicy) -> (PositionSequencer, SimHandle, HalCore) {
    let Bench { gantry, sim, hal } = bench();
    (PositionSequencer::new(gantry, policy), sim, hal)
}

#[test]
fn test_move_to_drives_x_then_y() {
    let (mut seq, sim, _hal) = sequencer(CaptureFailurePolicy::Abort);
    let pins = sim.pins();
    sim.start_recording();

    let [x, y] = seq.move_to(Position::P2).expect("move");
    assert_eq!(x.sensor, SensorId::X_MIN);
    assert_eq!(y.sensor, SensorId::Y_MAX);

    let events = sim.take_events();
    let pin_of = |e: &BenchEvent| match e {
        BenchEvent::Output { pin, .. } => *pin,
    };
    let last_x = events
        .iter()
        .rposition(|e| pin_of(e) == pins.x_dir || pin_of(e) == pins.x_step)
        .expect("x events");
    let first_y = events
        .iter()
        .position(|e| pin_of(e) == pins.y_dir || pin_of(e) == pins.y_step)
        .expect("y events");
    assert!(last_x < first_y);

    assert_eq!(
        events[0],
        BenchEvent::Output {
            pin: pins.x_dir,
            level: Level::Low
        }
    );
    assert_eq!(
        events[first_y],
        BenchEvent::Output {
            pin: pins.y_dir,
            level: Level::High
        }
    );
}

#[test]
fn test_full_sequence_visits_corners_and_returns() {
    let (mut seq, sim, _hal) = sequencer(CaptureFailurePolicy::Abort);

    let first = seq.run_motion_sequence().expect("first run");
    assert_eq!(first.visited, FULL_SEQUENCE.to_vec());
    assert_eq!(first.homings.len(), 10);
    assert!(first.images.is_empty());
    assert_eq!(first.total_steps(), 2800);
    assert_eq!(sim.position(AxisId::X), 0);
    assert_eq!(sim.position(AxisId::Y), 0);

    let second = seq.run_motion_sequence().expect("second run");
    assert_eq!(second.visited, first.visited);
    let commanded = |r: &gantry_motion::SequenceReport| {
        r.homings
            .iter()
            .map(|h| (h.axis, h.direction, h.sensor))
            .collect::<Vec<_>>()
    };
    assert_eq!(commanded(&second), commanded(&first));
    assert_eq!(second.total_steps(), 2400);
}

#[test]
fn test_sequence_from_far_corner() {
    let (mut seq, sim, _hal) = sequencer(CaptureFailurePolicy::Abort);
    sim.set_position(AxisId::X, 400);
    sim.set_position(AxisId::Y, 400);

    let report = seq.run_motion_sequence().expect("run");
    assert_eq!(report.visited, FULL_SEQUENCE.to_vec());
    assert_eq!(sim.position(AxisId::X), 0);
    assert_eq!(sim.position(AxisId::Y), 0);
}

#[test]
fn test_capture_sequence_returns_four_tagged_images() {
    let (mut seq, sim, _hal) = sequencer(CaptureFailurePolicy::Abort);
    let mut camera = StubCamera::working();

    let images = seq.run_capture_sequence(&mut camera).expect("run");

    assert_eq!(camera.calls, 4);
    assert_eq!(
        images.iter().map(|i| i.position_index).collect::<Vec<_>>(),
        vec![1, 2, 3, 4]
    );
    assert!(images.iter().all(|i| !i.bytes.is_empty()));
    assert_eq!(images[2].bytes[2], 3);
    assert_eq!(sim.position(AxisId::X), 0);
    assert_eq!(sim.position(AxisId::Y), 0);
}

#[test]
fn test_capture_failure_at_position_three_aborts() {
    let (mut seq, sim, _hal) = sequencer(CaptureFailurePolicy::Abort);
    let mut camera = StubCamera::failing_on(3, CaptureError::FrameReadFailed("timeout".into()));

    match seq.run_capture_sequence(&mut camera) {
        Err(SequenceError::Capture {
            position_index,
            source,
        }) => {
            assert_eq!(position_index, 3);
            assert_eq!(source, CaptureError::FrameReadFailed("timeout".into()));
        }
        other => panic!("expected capture error, got {other:?}"),
    }
    assert_eq!(camera.calls, 3);
    // left at P3 (X-max, Y-min)
    assert_eq!(sim.position(AxisId::X), 400);
    assert_eq!(sim.position(AxisId::Y), 0);
}

#[test]
fn test_capture_failure_policy_decides_final_position() {
    let run = |policy| {
        let (mut seq, sim, _hal) = sequencer(policy);
        let mut camera = StubCamera::failing_on(3, CaptureError::DeviceClosed);
        let result = seq.run_capture_sequence(&mut camera);
        assert!(matches!(
            result,
            Err(SequenceError::Capture {
                position_index: 3,
                source: CaptureError::DeviceClosed
            })
        ));
        assert_eq!(camera.calls, 3);
        assert_eq!(seq.gantry().homing_state(), HomingState::Reached);
        (sim.position(AxisId::X), sim.position(AxisId::Y), sim.travel(AxisId::X))
    };

    let (x, y, travel_x) = run(CaptureFailurePolicy::Abort);
    assert_eq!((x, y), (travel_x, 0), "abort stays at P3");

    let (x, y, _) = run(CaptureFailurePolicy::ReturnToOrigin);
    assert_eq!((x, y), (0, 0), "return_to_origin drives back to P1");
}

#[test]
fn test_empty_frame_is_encode_failure() {
    struct EmptyCamera;
    impl gantry_motion::CaptureDevice for EmptyCamera {
        fn capture_still(&mut self) -> Result<Vec<u8>, CaptureError> {
            Ok(Vec::new())
        }
    }

    let (mut seq, _sim, _hal) = sequencer(CaptureFailurePolicy::Abort);
    assert!(matches!(
        seq.run_capture_sequence(&mut EmptyCamera),
        Err(SequenceError::Capture {
            position_index: 1,
            source: CaptureError::EncodeFailed(_)
        })
    ));
}
