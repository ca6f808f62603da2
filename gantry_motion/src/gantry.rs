//! Hardware context.
//!
//! `Gantry` owns both axis drivers and the sensor bank for the lifetime
//! of the process. It is built explicitly from claimed lines; dropping it
//! drives every output low and releases it.

use crate::axis::AxisDriver;
use crate::error::MotionError;
use crate::homing::{HomingController, HomingReport, HomingState};
use gantry_common::config::MotionConfig;
use gantry_common::motion::{AxisId, Direction, SensorId};
use gantry_hal::{GantryLines, SensorBank};
use tracing::info;

#[derive(Debug)]
pub struct Gantry {
    x: AxisDriver,
    y: AxisDriver,
    sensors: SensorBank,
    homing: HomingController,
}

impl Gantry {
    pub fn new(lines: GantryLines, config: &MotionConfig) -> Self {
        let delay = config.step_delay();
        info!(
            "Gantry ready: step delay {:?}, homing ceiling {:?}",
            delay,
            config.homing_step_limit()
        );
        Self {
            x: AxisDriver::new(lines.x, delay),
            y: AxisDriver::new(lines.y, delay),
            sensors: lines.sensors,
            homing: HomingController::new(config.homing_step_limit()),
        }
    }

    /// Home `axis` in `direction` until `sensor` triggers.
    pub fn home(
        &mut self,
        axis: AxisId,
        direction: Direction,
        sensor: SensorId,
    ) -> Result<HomingReport, MotionError> {
        let driver = match axis {
            AxisId::X => &mut self.x,
            AxisId::Y => &mut self.y,
        };
        self.homing.home(driver, direction, self.sensors.get(sensor))
    }

    pub fn axis(&self, axis: AxisId) -> &AxisDriver {
        match axis {
            AxisId::X => &self.x,
            AxisId::Y => &self.y,
        }
    }

    pub fn sensors(&self) -> &SensorBank {
        &self.sensors
    }

    pub fn homing_state(&self) -> HomingState {
        self.homing.state()
    }
}
