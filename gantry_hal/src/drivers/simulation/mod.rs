//! Simulation driver module.
//!
//! This module provides a software simulation driver for development and testing
//! without physical hardware.

mod bench;
mod driver;

pub use bench::{BenchEvent, SimBench, SimHandle};
pub use driver::SimulatedGpioDriver;

/// Value of `hal.driver` selecting this driver.
pub const DRIVER_NAME: &str = "simulation";
