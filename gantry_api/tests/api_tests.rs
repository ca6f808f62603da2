//! HTTP route tests.
//!
//! Drives the router with `tower::ServiceExt::oneshot` against a station
//! on the simulated bench (zero step delay) with stub cameras.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use base64::{Engine as _, engine::general_purpose};
use gantry_api::{Station, router};
use gantry_common::config::{ApiConfig, MotionConfig};
use gantry_common::hal::config::HalConfig;
use gantry_common::motion::{AxisId, CaptureFailurePolicy, SensorId};
use gantry_hal::HalCore;
use gantry_hal::drivers::simulation::{SimHandle, SimulatedGpioDriver};
use gantry_motion::{CaptureDevice, CaptureError, Gantry, PositionSequencer};
use serde_json::Value;
use tower::ServiceExt;

struct StubCamera {
    calls: u8,
    fail_on: Option<(u8, CaptureError)>,
}

impl CaptureDevice for StubCamera {
    fn capture_still(&mut self) -> Result<Vec<u8>, CaptureError> {
        self.calls += 1;
        match &self.fail_on {
            Some((call, e)) if *call == self.calls => Err(e.clone()),
            _ => Ok(vec![0xFF, 0xD8, self.calls, 0xFF, 0xD9]),
        }
    }
}

struct TestApp {
    app: Router,
    sim: SimHandle,
    _hal: HalCore,
}

fn app_with(camera: StubCamera, step_limit: u64, api: ApiConfig) -> TestApp {
    let motion = MotionConfig {
        step_delay_us: 0,
        max_homing_steps: step_limit,
        ..MotionConfig::default()
    };
    app_with_motion(camera, &motion, api)
}

fn app_with_motion(camera: StubCamera, motion: &MotionConfig, api: ApiConfig) -> TestApp {
    let driver = SimulatedGpioDriver::new();
    let sim = driver.handle();
    let mut hal = HalCore::with_driver(HalConfig::default(), Box::new(driver)).expect("hal");
    let lines = hal.claim_lines().expect("lines");
    let sequencer = PositionSequencer::new(Gantry::new(lines, motion), CaptureFailurePolicy::Abort);
    let station = Station::new(sequencer, Box::new(camera)).shared();
    TestApp {
        app: router(station, &api),
        sim,
        _hal: hal,
    }
}

fn app(camera: StubCamera) -> TestApp {
    app_with(camera, 10_000, ApiConfig::default())
}

fn working() -> StubCamera {
    StubCamera {
        calls: 0,
        fail_on: None,
    }
}

fn failing_on(call: u8, e: CaptureError) -> StubCamera {
    StubCamera {
        calls: 0,
        fail_on: Some((call, e)),
    }
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_move_motors_success() {
    let t = app(working());
    let (status, body) = get(t.app, "/api/move_motors").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Motors moved to all positions.");
    assert_eq!(t.sim.position(AxisId::X), 0);
    assert_eq!(t.sim.position(AxisId::Y), 0);
}

#[tokio::test]
async fn test_images_success_returns_four_tagged_images() {
    let t = app(working());
    let (status, body) = get(t.app, "/api/movement_sequence_images").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    let images = body["images"].as_array().expect("images array");
    assert_eq!(images.len(), 4);
    for (i, entry) in images.iter().enumerate() {
        let n = i + 1;
        let object = entry.as_object().expect("entry object");
        assert_eq!(object.len(), 1);
        let encoded = object[&format!("image_number_{n}")].as_str().expect("base64");
        let bytes = general_purpose::STANDARD.decode(encoded).expect("decode");
        assert_eq!(bytes, vec![0xFF, 0xD8, n as u8, 0xFF, 0xD9]);
    }
}

#[tokio::test]
async fn test_images_camera_closed() {
    let t = app(failing_on(1, CaptureError::DeviceClosed));
    let (status, body) = get(t.app, "/api/movement_sequence_images").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Camera initialization failed.");
}

#[tokio::test]
async fn test_images_frame_read_failure_at_position_three() {
    let t = app(failing_on(3, CaptureError::FrameReadFailed("no frame".into())));
    let (status, body) = get(t.app, "/api/movement_sequence_images").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Image capture failed.");
    assert!(body.get("images").is_none());
    // stopped at P3
    assert_eq!(t.sim.position(AxisId::X), t.sim.travel(AxisId::X));
    assert_eq!(t.sim.position(AxisId::Y), 0);
}

#[tokio::test]
async fn test_images_encode_failure() {
    let t = app(failing_on(2, CaptureError::EncodeFailed("bad".into())));
    let (status, body) = get(t.app, "/api/movement_sequence_images").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Image encoding failed.");
}

#[tokio::test]
async fn test_move_motors_step_ceiling_is_500() {
    let t = app_with(working(), 25, ApiConfig::default());
    t.sim.disconnect_sensor(SensorId::X_MIN);
    let (status, body) = get(t.app, "/api/move_motors").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], "error");
    assert!(
        body["message"].as_str().unwrap().contains("X-min"),
        "{body}"
    );
}

/// Station at P1 with a real step delay, recording every output write.
fn slow_app_at_origin() -> TestApp {
    let motion = MotionConfig {
        step_delay_us: 20,
        max_homing_steps: 10_000,
        ..MotionConfig::default()
    };
    let t = app_with_motion(working(), &motion, ApiConfig::default());
    t.sim.set_position(AxisId::X, 0);
    t.sim.set_position(AxisId::Y, 0);
    t.sim.start_recording();
    t
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_runs_do_not_interleave() {
    // one run on its own, for reference
    let solo = slow_app_at_origin();
    let (status, _) = get(solo.app.clone(), "/api/move_motors").await;
    assert_eq!(status, StatusCode::OK);
    let one_run = solo.sim.take_events();
    assert!(!one_run.is_empty());

    let t = slow_app_at_origin();
    let (a, b) = tokio::join!(
        get(t.app.clone(), "/api/move_motors"),
        get(t.app.clone(), "/api/move_motors"),
    );
    for (status, body) in [a, b] {
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Motors moved to all positions.");
    }

    // both runs start and end at P1, so back-to-back runs record the
    // same trace twice; any overlap would splice the two pulse trains
    let events = t.sim.take_events();
    assert_eq!(events.len(), 2 * one_run.len());
    let (first, second) = events.split_at(one_run.len());
    assert_eq!(first, &one_run[..]);
    assert_eq!(second, &one_run[..]);
    assert_eq!(t.sim.position(AxisId::X), 0);
    assert_eq!(t.sim.position(AxisId::Y), 0);
}

#[tokio::test]
async fn test_cors_mirrors_origin_with_credentials() {
    let t = app(working());
    let response = t
        .app
        .oneshot(
            Request::get("/api/move_motors")
                .header(header::ORIGIN, "http://viewer.local:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://viewer.local:3000"
    );
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
}

#[tokio::test]
async fn test_cors_disabled() {
    let api = ApiConfig {
        cors: false,
        ..ApiConfig::default()
    };
    let t = app_with(working(), 10_000, api);
    let response = t
        .app
        .oneshot(
            Request::get("/api/move_motors")
                .header(header::ORIGIN, "http://viewer.local:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none()
    );
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let t = app(working());
    let response = t
        .app
        .oneshot(Request::get("/api/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
