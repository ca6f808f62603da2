//! Raspberry Pi header GPIO driver.
//!
//! Backed by `rppal`, which talks to `/dev/gpiomem`. Outputs are claimed
//! driven low; inputs are claimed with the SoC pull-up enabled. Line
//! numbers are BCM.

use gantry_common::hal::config::HalConfig;
use gantry_common::hal::driver::{
    DriverDiagnostics, GpioDriver, HalError, InputLine, OutputLine,
};
use gantry_common::hal::types::Level;
use rppal::gpio::{Gpio, InputPin, OutputPin};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info};

/// Value of `hal.driver` selecting this driver.
pub const DRIVER_NAME: &str = "rpi";

/// GPIO driver for the Raspberry Pi 40-pin header.
pub struct RpiGpioDriver {
    gpio: Option<Gpio>,
    outputs: Arc<AtomicUsize>,
    inputs: Arc<AtomicUsize>,
}

impl RpiGpioDriver {
    /// Create an uninitialized driver.
    pub fn new() -> Self {
        Self {
            gpio: None,
            outputs: Arc::new(AtomicUsize::new(0)),
            inputs: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn gpio(&self) -> Result<&Gpio, HalError> {
        self.gpio
            .as_ref()
            .ok_or_else(|| HalError::InitFailed("rpi driver not initialized".to_string()))
    }
}

impl Default for RpiGpioDriver {
    fn default() -> Self {
        Self::new()
    }
}

fn unavailable(pin: u8, e: rppal::gpio::Error) -> HalError {
    HalError::LineUnavailable {
        pin,
        reason: e.to_string(),
    }
}

impl GpioDriver for RpiGpioDriver {
    fn name(&self) -> &'static str {
        DRIVER_NAME
    }

    fn version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    fn init(&mut self, _config: &HalConfig) -> Result<(), HalError> {
        let gpio = Gpio::new().map_err(|e| HalError::InitFailed(format!("GPIO: {e}")))?;
        info!("Raspberry Pi GPIO opened");
        self.gpio = Some(gpio);
        Ok(())
    }

    fn claim_output(&mut self, pin: u8) -> Result<Box<dyn OutputLine>, HalError> {
        let out = self
            .gpio()?
            .get(pin)
            .map_err(|e| unavailable(pin, e))?
            .into_output_low();
        self.outputs.fetch_add(1, Ordering::Relaxed);
        debug!("GPIO {} claimed as output", pin);
        Ok(Box::new(RpiOutputLine {
            pin,
            out: Some(out),
            claimed: Arc::clone(&self.outputs),
        }))
    }

    fn claim_input_pullup(&mut self, pin: u8) -> Result<Box<dyn InputLine>, HalError> {
        let input = self
            .gpio()?
            .get(pin)
            .map_err(|e| unavailable(pin, e))?
            .into_input_pullup();
        self.inputs.fetch_add(1, Ordering::Relaxed);
        debug!("GPIO {} claimed as pull-up input", pin);
        Ok(Box::new(RpiInputLine {
            pin,
            input,
            claimed: Arc::clone(&self.inputs),
        }))
    }

    fn shutdown(&mut self) -> Result<(), HalError> {
        info!("Raspberry Pi GPIO closed");
        self.gpio = None;
        Ok(())
    }

    fn diagnostics(&self) -> Option<DriverDiagnostics> {
        Some(DriverDiagnostics {
            outputs_claimed: self.outputs.load(Ordering::Relaxed),
            inputs_claimed: self.inputs.load(Ordering::Relaxed),
            custom: None,
        })
    }
}

struct RpiOutputLine {
    pin: u8,
    out: Option<OutputPin>,
    claimed: Arc<AtomicUsize>,
}

impl OutputLine for RpiOutputLine {
    fn pin(&self) -> u8 {
        self.pin
    }

    fn set_level(&mut self, level: Level) {
        if let Some(out) = self.out.as_mut() {
            match level {
                Level::High => out.set_high(),
                Level::Low => out.set_low(),
            }
        }
    }

    fn release(&mut self) {
        // Dropping the pin restores its previous mode.
        if let Some(mut out) = self.out.take() {
            out.set_low();
            self.claimed.fetch_sub(1, Ordering::Relaxed);
        }
    }
}

struct RpiInputLine {
    pin: u8,
    input: InputPin,
    claimed: Arc<AtomicUsize>,
}

impl InputLine for RpiInputLine {
    fn pin(&self) -> u8 {
        self.pin
    }

    fn is_high(&self) -> bool {
        self.input.is_high()
    }
}

impl Drop for RpiInputLine {
    fn drop(&mut self) {
        self.claimed.fetch_sub(1, Ordering::Relaxed);
    }
}
