//! Shared bench setup.

mod homing;
mod sequence;

use gantry_common::config::MotionConfig;
use gantry_common::hal::config::HalConfig;
use gantry_hal::HalCore;
use gantry_hal::drivers::simulation::{SimHandle, SimulatedGpioDriver};
use gantry_motion::{CaptureDevice, CaptureError, Gantry};

/// A gantry on the simulated bench, zero step delay.
pub struct Bench {
    pub gantry: Gantry,
    pub sim: SimHandle,
    pub hal: HalCore,
}

pub fn bench_with(hal_config: HalConfig, step_limit: u64) -> Bench {
    let driver = SimulatedGpioDriver::new();
    let sim = driver.handle();
    let mut hal = HalCore::with_driver(hal_config, Box::new(driver)).expect("hal");
    let lines = hal.claim_lines().expect("lines");
    let motion = MotionConfig {
        step_delay_us: 0,
        max_homing_steps: step_limit,
        ..MotionConfig::default()
    };
    Bench {
        gantry: Gantry::new(lines, &motion),
        sim,
        hal,
    }
}

pub fn bench() -> Bench {
    bench_with(HalConfig::default(), 10_000)
}

/// Camera stub: returns a numbered payload, optionally failing on one call.
pub struct StubCamera {
    pub calls: usize,
    pub fail_on: Option<(usize, CaptureError)>,
}

impl StubCamera {
    pub fn working() -> Self {
        Self {
            calls: 0,
            fail_on: None,
        }
    }

    pub fn failing_on(call: usize, error: CaptureError) -> Self {
        Self {
            calls: 0,
            fail_on: Some((call, error)),
        }
    }
}

impl CaptureDevice for StubCamera {
    fn capture_still(&mut self) -> Result<Vec<u8>, CaptureError> {
        self.calls += 1;
        if let Some((call, error)) = &self.fail_on {
            if *call == self.calls {
                return Err(error.clone());
            }
        }
        Ok(vec![0xFF, 0xD8, self.calls as u8, 0xFF, 0xD9])
    }
}
