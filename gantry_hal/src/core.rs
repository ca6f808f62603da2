//! HAL Core struct and line acquisition.
//!
//! The `HalCore` struct is the main entry point for HAL operations.
//! It manages driver loading, one-shot line acquisition, and driver
//! shutdown.

use gantry_common::hal::config::HalConfig;
use gantry_common::hal::driver::{DriverDiagnostics, GpioDriver, HalError};
use gantry_common::motion::AxisId;
use tracing::{debug, info, warn};

use crate::drivers;
use crate::lines::{AxisLines, DriveLine, GantryLines, SensorBank};

/// HAL Core manages the GPIO driver and hands out the station's lines.
pub struct HalCore {
    /// HAL configuration
    config: HalConfig,
    /// Active driver instance
    driver: Option<Box<dyn GpioDriver>>,
    /// Lines are claimed at most once per process
    lines_claimed: bool,
}

impl HalCore {
    /// Create a new HalCore instance with the given configuration.
    ///
    /// # Errors
    /// Returns error if configuration validation fails.
    pub fn new(config: HalConfig) -> Result<Self, HalError> {
        config.validate()?;

        info!(
            "HalCore created (drivers available: {:?})",
            drivers::available()
        );

        Ok(Self {
            config,
            driver: None,
            lines_claimed: false,
        })
    }

    /// Create a HalCore around an already constructed driver.
    ///
    /// The driver is initialized immediately. Used by tests that need a
    /// handle on the driver before it disappears behind the trait object.
    pub fn with_driver(config: HalConfig, mut driver: Box<dyn GpioDriver>) -> Result<Self, HalError> {
        config.validate()?;
        driver.init(&config)?;
        info!("HalCore using driver: {} v{}", driver.name(), driver.version());

        Ok(Self {
            config,
            driver: Some(driver),
            lines_claimed: false,
        })
    }

    /// Initialize the HAL Core - create and initialize the named driver.
    ///
    /// # Errors
    /// Returns error if the driver is unknown or its initialization fails.
    pub fn init(&mut self, driver_name: &str) -> Result<(), HalError> {
        if self.driver.is_some() {
            return Err(HalError::InitFailed("driver already initialized".to_string()));
        }
        info!("Initializing HalCore with driver '{}'...", driver_name);

        let mut driver = drivers::create_driver(driver_name)?;
        info!("Created driver: {} v{}", driver.name(), driver.version());

        driver.init(&self.config)?;
        self.driver = Some(driver);

        info!("HalCore initialized successfully");
        Ok(())
    }

    /// Claim every line of the station.
    ///
    /// Outputs are claimed driven low, sensor inputs with pull-up bias.
    /// Any failure is returned as-is; lines claimed before the failure are
    /// released as the partial set is dropped.
    ///
    /// # Errors
    /// - `HalError::InitFailed` if no driver is loaded or lines were already claimed
    /// - `HalError::LineUnavailable` if the backend refuses a line
    pub fn claim_lines(&mut self) -> Result<GantryLines, HalError> {
        let driver = self
            .driver
            .as_mut()
            .ok_or_else(|| HalError::InitFailed("Driver not initialized".to_string()))?;
        if self.lines_claimed {
            return Err(HalError::InitFailed("lines already claimed".to_string()));
        }

        let pins = self.config.pins;
        let mut claim_axis = |axis: AxisId| -> Result<AxisLines, HalError> {
            let dir = DriveLine::new(driver.claim_output(pins.dir_pin(axis))?);
            let step = DriveLine::new(driver.claim_output(pins.step_pin(axis))?);
            debug!(
                "Claimed axis {} outputs: dir={} step={}",
                axis,
                dir.pin(),
                step.pin()
            );
            Ok(AxisLines { axis, dir, step })
        };
        let x = claim_axis(AxisId::X)?;
        let y = claim_axis(AxisId::Y)?;

        let sensors = SensorBank::try_from_fn(|id| {
            let line = driver.claim_input_pullup(pins.sensor_pin(id))?;
            debug!("Claimed sensor {} on pin {}", id, line.pin());
            Ok::<_, HalError>(line)
        })?;

        self.lines_claimed = true;
        info!("Claimed 4 outputs and 4 limit inputs");
        Ok(GantryLines { x, y, sensors })
    }

    /// Name of the loaded driver, if any.
    pub fn driver_name(&self) -> Option<&'static str> {
        self.driver.as_ref().map(|d| d.name())
    }

    /// Diagnostics of the loaded driver, if it provides any.
    pub fn diagnostics(&self) -> Option<DriverDiagnostics> {
        self.driver.as_ref().and_then(|d| d.diagnostics())
    }

    /// Shut the driver down. Idempotent.
    ///
    /// Lines should be dropped first so each is released low before the
    /// backend goes away.
    pub fn shutdown(&mut self) -> Result<(), HalError> {
        if let Some(mut driver) = self.driver.take() {
            info!("Shutting down driver '{}'", driver.name());
            driver.shutdown()?;
        }
        Ok(())
    }
}

impl Drop for HalCore {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            warn!("Driver shutdown failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gantry_common::motion::SensorId;

    #[test]
    fn test_init_unknown_driver() {
        let mut hal = HalCore::new(HalConfig::default()).unwrap();
        assert!(matches!(
            hal.init("ethercat"),
            Err(HalError::DriverNotFound(_))
        ));
    }

    #[test]
    fn test_claim_before_init_fails() {
        let mut hal = HalCore::new(HalConfig::default()).unwrap();
        assert!(matches!(hal.claim_lines(), Err(HalError::InitFailed(_))));
    }

    #[test]
    fn test_claim_lines_once() {
        let mut hal = HalCore::new(HalConfig::default()).unwrap();
        hal.init("simulation").unwrap();
        assert_eq!(hal.driver_name(), Some("simulation"));

        let lines = hal.claim_lines().unwrap();
        assert_eq!(lines.x.dir.pin(), 5);
        assert_eq!(lines.y.step.pin(), 19);
        assert_eq!(lines.sensors.get(SensorId::Y_MAX).pin(), 4);

        assert!(matches!(hal.claim_lines(), Err(HalError::InitFailed(_))));
        drop(lines);
        hal.shutdown().unwrap();
        hal.shutdown().unwrap();
        assert_eq!(hal.driver_name(), None);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = HalConfig::default();
        config.pins.y_max = config.pins.x_min;
        assert!(matches!(
            HalCore::new(config),
            Err(HalError::ConfigError(_))
        ));
    }
}
