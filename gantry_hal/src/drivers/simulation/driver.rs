//! Simulation driver implementation.
//!
//! The `SimulatedGpioDriver` implements the `GpioDriver` trait on top of a
//! [`SimBench`], so the full station can run without a Raspberry Pi.

use super::bench::{SimBench, SimHandle};
use gantry_common::hal::config::HalConfig;
use gantry_common::hal::driver::{
    DriverDiagnostics, GpioDriver, HalError, InputLine, OutputLine,
};
use gantry_common::hal::types::Level;
use gantry_common::motion::AxisId;
use tracing::{debug, info};

/// Simulation driver implementing the GpioDriver trait.
pub struct SimulatedGpioDriver {
    /// Driver name
    name: &'static str,
    /// Driver version
    version: &'static str,
    /// Initialized flag
    initialized: bool,
    /// Shared bench
    handle: SimHandle,
}

impl SimulatedGpioDriver {
    /// Create a new simulation driver instance with a default bench.
    pub fn new() -> Self {
        Self {
            name: super::DRIVER_NAME,
            version: env!("CARGO_PKG_VERSION"),
            initialized: false,
            handle: SimHandle::new(SimBench::new(&HalConfig::default())),
        }
    }

    /// Handle on the bench. Stays valid across `init`.
    pub fn handle(&self) -> SimHandle {
        self.handle.clone()
    }

    fn ensure_initialized(&self) -> Result<(), HalError> {
        if self.initialized {
            Ok(())
        } else {
            Err(HalError::InitFailed("simulation driver not initialized".to_string()))
        }
    }
}

impl Default for SimulatedGpioDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl GpioDriver for SimulatedGpioDriver {
    fn name(&self) -> &'static str {
        self.name
    }

    fn version(&self) -> &'static str {
        self.version
    }

    fn init(&mut self, config: &HalConfig) -> Result<(), HalError> {
        info!(
            "Initializing simulation driver: travel x={} y={}, start x={} y={}",
            config.simulation.travel_x_steps,
            config.simulation.travel_y_steps,
            config.simulation.start_x_steps,
            config.simulation.start_y_steps
        );
        self.handle.with(|bench| *bench = SimBench::new(config));
        self.initialized = true;
        Ok(())
    }

    fn claim_output(&mut self, pin: u8) -> Result<Box<dyn OutputLine>, HalError> {
        self.ensure_initialized()?;
        if !self.handle.with(|bench| bench.claim_output(pin)) {
            return Err(HalError::LineUnavailable {
                pin,
                reason: "already claimed".to_string(),
            });
        }
        debug!("Simulated output {} claimed", pin);
        Ok(Box::new(SimOutputLine {
            pin,
            handle: self.handle.clone(),
            released: false,
        }))
    }

    fn claim_input_pullup(&mut self, pin: u8) -> Result<Box<dyn InputLine>, HalError> {
        self.ensure_initialized()?;
        if !self.handle.with(|bench| bench.claim_input(pin)) {
            return Err(HalError::LineUnavailable {
                pin,
                reason: "already claimed".to_string(),
            });
        }
        debug!("Simulated input {} claimed", pin);
        Ok(Box::new(SimInputLine {
            pin,
            handle: self.handle.clone(),
        }))
    }

    fn shutdown(&mut self) -> Result<(), HalError> {
        info!(
            "Simulation driver shutdown (x at {}, y at {})",
            self.handle.position(AxisId::X),
            self.handle.position(AxisId::Y)
        );
        self.initialized = false;
        Ok(())
    }

    fn diagnostics(&self) -> Option<DriverDiagnostics> {
        let (outputs_claimed, inputs_claimed) = self.handle.with(|bench| bench.claimed_counts());
        Some(DriverDiagnostics {
            outputs_claimed,
            inputs_claimed,
            custom: Some(format!(
                r#"{{"x_position":{},"y_position":{}}}"#,
                self.handle.position(AxisId::X),
                self.handle.position(AxisId::Y)
            )),
        })
    }
}

// ─── Lines ──────────────────────────────────────────────────────────

struct SimOutputLine {
    pin: u8,
    handle: SimHandle,
    released: bool,
}

impl OutputLine for SimOutputLine {
    fn pin(&self) -> u8 {
        self.pin
    }

    fn set_level(&mut self, level: Level) {
        if !self.released {
            self.handle.with(|bench| bench.write_output(self.pin, level));
        }
    }

    fn release(&mut self) {
        if !self.released {
            self.handle.with(|bench| bench.release_output(self.pin));
            self.released = true;
        }
    }
}

struct SimInputLine {
    pin: u8,
    handle: SimHandle,
}

impl InputLine for SimInputLine {
    fn pin(&self) -> u8 {
        self.pin
    }

    fn is_high(&self) -> bool {
        self.handle.with(|bench| bench.read_input(self.pin))
    }
}

impl Drop for SimInputLine {
    fn drop(&mut self) {
        self.handle.with(|bench| bench.release_input(self.pin));
    }
}
