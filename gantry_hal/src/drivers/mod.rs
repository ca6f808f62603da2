//! GPIO driver implementations.
//!
//! - [`simulation`] - Simulated gantry bench for development and testing
//! - `rpi` - Raspberry Pi header GPIO (feature `rpi`)
//!
//! The set of drivers is fixed at build time. `hal.driver` in the config
//! picks one of them by name.
//!
//! # Adding New Drivers
//!
//! 1. Create a new submodule under `drivers/`
//! 2. Implement the `GpioDriver` trait from `gantry_common::hal::driver`
//! 3. Add its name to [`available`] and an arm to [`create_driver`]

#[cfg(feature = "rpi")]
pub mod rpi;
pub mod simulation;

use gantry_common::hal::driver::{GpioDriver, HalError};

/// Names of the drivers compiled into this build.
pub fn available() -> Vec<&'static str> {
    let mut names = vec![simulation::DRIVER_NAME];
    #[cfg(feature = "rpi")]
    names.push(rpi::DRIVER_NAME);
    names
}

/// Construct the driver named by `hal.driver`.
///
/// # Errors
/// `HalError::DriverNotFound` for an unknown name, or for `rpi` in a build
/// without the `rpi` feature.
pub fn create_driver(name: &str) -> Result<Box<dyn GpioDriver>, HalError> {
    match name {
        simulation::DRIVER_NAME => Ok(Box::new(simulation::SimulatedGpioDriver::new())),
        #[cfg(feature = "rpi")]
        rpi::DRIVER_NAME => Ok(Box::new(rpi::RpiGpioDriver::new())),
        #[cfg(not(feature = "rpi"))]
        "rpi" => Err(HalError::DriverNotFound(
            "rpi (not compiled in, rebuild with --features rpi)".to_string(),
        )),
        other => Err(HalError::DriverNotFound(other.to_string())),
    }
}
