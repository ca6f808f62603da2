//! HAL configuration types.
//!
//! - `HalConfig` - `[hal]` section: driver selection, pin map, simulation bench
//! - `PinMap` - BCM numbers of the motor and sensor lines
//! - `SimulationConfig` - geometry of the simulated gantry

use crate::consts::{
    DEFAULT_SIM_TRAVEL_STEPS, DEFAULT_X_DIR_PIN, DEFAULT_X_MAX_PIN, DEFAULT_X_MIN_PIN,
    DEFAULT_X_STEP_PIN, DEFAULT_Y_DIR_PIN, DEFAULT_Y_MAX_PIN, DEFAULT_Y_MIN_PIN,
    DEFAULT_Y_STEP_PIN, MAX_BCM_PIN,
};
use crate::hal::driver::HalError;
use crate::motion::{AxisId, LimitEnd, SensorId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

fn default_driver() -> String {
    "simulation".to_string()
}

/// `[hal]` section.
///
/// # TOML Example
///
/// ```toml
/// [hal]
/// driver = "rpi"
///
/// [hal.pins]
/// x_dir = 5
/// x_step = 6
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HalConfig {
    /// Name of the registered driver to load ("simulation", "rpi").
    #[serde(default = "default_driver")]
    pub driver: String,

    /// Line assignment.
    pub pins: PinMap,

    /// Simulated bench geometry (only read by the simulation driver).
    pub simulation: SimulationConfig,
}

impl Default for HalConfig {
    fn default() -> Self {
        Self {
            driver: default_driver(),
            pins: PinMap::default(),
            simulation: SimulationConfig::default(),
        }
    }
}

impl HalConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), HalError> {
        if self.driver.is_empty() {
            return Err(HalError::ConfigError("driver cannot be empty".to_string()));
        }
        self.pins.validate()?;
        self.simulation.validate()
    }
}

/// BCM pin numbers for every line the station drives or reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PinMap {
    pub x_dir: u8,
    pub x_step: u8,
    pub y_dir: u8,
    pub y_step: u8,
    pub x_min: u8,
    pub x_max: u8,
    pub y_min: u8,
    pub y_max: u8,
}

impl Default for PinMap {
    fn default() -> Self {
        Self {
            x_dir: DEFAULT_X_DIR_PIN,
            x_step: DEFAULT_X_STEP_PIN,
            y_dir: DEFAULT_Y_DIR_PIN,
            y_step: DEFAULT_Y_STEP_PIN,
            x_min: DEFAULT_X_MIN_PIN,
            x_max: DEFAULT_X_MAX_PIN,
            y_min: DEFAULT_Y_MIN_PIN,
            y_max: DEFAULT_Y_MAX_PIN,
        }
    }
}

impl PinMap {
    /// Direction line of an axis.
    pub fn dir_pin(&self, axis: AxisId) -> u8 {
        match axis {
            AxisId::X => self.x_dir,
            AxisId::Y => self.y_dir,
        }
    }

    /// Step line of an axis.
    pub fn step_pin(&self, axis: AxisId) -> u8 {
        match axis {
            AxisId::X => self.x_step,
            AxisId::Y => self.y_step,
        }
    }

    /// Input line of a limit sensor.
    pub fn sensor_pin(&self, sensor: SensorId) -> u8 {
        match (sensor.axis, sensor.end) {
            (AxisId::X, LimitEnd::Min) => self.x_min,
            (AxisId::X, LimitEnd::Max) => self.x_max,
            (AxisId::Y, LimitEnd::Min) => self.y_min,
            (AxisId::Y, LimitEnd::Max) => self.y_max,
        }
    }

    /// All assignments as `(name, pin)` pairs.
    pub fn assignments(&self) -> [(&'static str, u8); 8] {
        [
            ("x_dir", self.x_dir),
            ("x_step", self.x_step),
            ("y_dir", self.y_dir),
            ("y_step", self.y_step),
            ("x_min", self.x_min),
            ("x_max", self.x_max),
            ("y_min", self.y_min),
            ("y_max", self.y_max),
        ]
    }

    /// Every pin must be a header GPIO and used exactly once.
    pub fn validate(&self) -> Result<(), HalError> {
        let mut seen: HashMap<u8, &'static str> = HashMap::new();
        for (name, pin) in self.assignments() {
            if pin > MAX_BCM_PIN {
                return Err(HalError::ConfigError(format!(
                    "pin {name} = {pin} is out of range (0..={MAX_BCM_PIN})"
                )));
            }
            if let Some(other) = seen.insert(pin, name) {
                return Err(HalError::ConfigError(format!(
                    "pin {pin} assigned to both {other} and {name}"
                )));
            }
        }
        Ok(())
    }
}

/// Geometry of the simulated gantry bench, in steps.
///
/// Each carriage travels between 0 (min sensor) and `travel_*_steps`
/// (max sensor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    pub travel_x_steps: u32,
    pub travel_y_steps: u32,
    pub start_x_steps: u32,
    pub start_y_steps: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            travel_x_steps: DEFAULT_SIM_TRAVEL_STEPS,
            travel_y_steps: DEFAULT_SIM_TRAVEL_STEPS,
            start_x_steps: DEFAULT_SIM_TRAVEL_STEPS / 2,
            start_y_steps: DEFAULT_SIM_TRAVEL_STEPS / 2,
        }
    }
}

impl SimulationConfig {
    /// Travel of an axis.
    pub fn travel(&self, axis: AxisId) -> u32 {
        match axis {
            AxisId::X => self.travel_x_steps,
            AxisId::Y => self.travel_y_steps,
        }
    }

    /// Start position of an axis.
    pub fn start(&self, axis: AxisId) -> u32 {
        match axis {
            AxisId::X => self.start_x_steps,
            AxisId::Y => self.start_y_steps,
        }
    }

    pub fn validate(&self) -> Result<(), HalError> {
        for axis in AxisId::ALL {
            if self.travel(axis) == 0 {
                return Err(HalError::ConfigError(format!(
                    "simulation travel of axis {axis} must be > 0"
                )));
            }
            if self.start(axis) > self.travel(axis) {
                return Err(HalError::ConfigError(format!(
                    "simulation start of axis {axis} ({}) exceeds travel ({})",
                    self.start(axis),
                    self.travel(axis)
                )));
            }
        }
        Ok(())
    }
}
