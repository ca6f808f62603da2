//! HAL driver trait, line traits and error types.
//!
//! This module defines:
//! - `GpioDriver` trait - Interface for pluggable GPIO backends
//! - `OutputLine` / `InputLine` traits - Claimed digital lines
//! - `HalError` enum - Error types for HAL operations
//! - `DriverDiagnostics` struct - Optional driver diagnostics

use crate::hal::config::HalConfig;
use crate::hal::types::Level;
use thiserror::Error;

/// Error types for HAL operations.
#[derive(Debug, Clone, Error)]
pub enum HalError {
    /// Driver initialization failed
    #[error("Initialization failed: {0}")]
    InitFailed(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A line could not be claimed
    #[error("GPIO line {pin} unavailable: {reason}")]
    LineUnavailable {
        /// BCM pin number
        pin: u8,
        /// Backend-specific reason
        reason: String,
    },

    /// Driver not found
    #[error("Driver not found: {0}")]
    DriverNotFound(String),
}

/// Optional driver diagnostics.
#[derive(Debug, Clone, Default)]
pub struct DriverDiagnostics {
    /// Number of output lines currently claimed
    pub outputs_claimed: usize,
    /// Number of input lines currently claimed
    pub inputs_claimed: usize,
    /// Driver-specific diagnostics (JSON string)
    pub custom: Option<String>,
}

/// A claimed digital output.
///
/// Writes are infallible: a line that could be claimed can be driven.
/// Hardware faults surface once, when the line is claimed.
pub trait OutputLine: Send {
    /// BCM pin number.
    fn pin(&self) -> u8;

    /// Drive the line.
    fn set_level(&mut self, level: Level);

    /// Drive the line low and hand it back to the backend.
    ///
    /// Must be idempotent; called from `Drop` of the owning wrapper.
    fn release(&mut self);
}

/// A claimed digital input with pull-up bias.
pub trait InputLine: Send {
    /// BCM pin number.
    fn pin(&self) -> u8;

    /// Current logic level. An unconnected line reads high.
    fn is_high(&self) -> bool;
}

/// Trait defining the interface for GPIO drivers.
///
/// `HalCore` manages drivers through this trait, enabling pluggable
/// backends (simulation bench, Raspberry Pi header, ...).
///
/// # Lifecycle
///
/// 1. `init()` - Called once at startup
/// 2. `claim_output()` / `claim_input_pullup()` - Called once per line
/// 3. `shutdown()` - Called when the station stops, after all lines are dropped
pub trait GpioDriver: Send {
    /// Returns the driver's unique identifier (e.g., "simulation", "rpi").
    fn name(&self) -> &'static str;

    /// Returns the driver's semantic version.
    fn version(&self) -> &'static str;

    /// Initialize the driver.
    ///
    /// # Errors
    /// Return `HalError::InitFailed` if the backend cannot be opened.
    fn init(&mut self, config: &HalConfig) -> Result<(), HalError>;

    /// Claim `pin` as an output, driven low.
    fn claim_output(&mut self, pin: u8) -> Result<Box<dyn OutputLine>, HalError>;

    /// Claim `pin` as an input with pull-up bias.
    fn claim_input_pullup(&mut self, pin: u8) -> Result<Box<dyn InputLine>, HalError>;

    /// Graceful shutdown of the driver.
    fn shutdown(&mut self) -> Result<(), HalError>;

    /// Get driver-specific diagnostics.
    /// Default: None
    fn diagnostics(&self) -> Option<DriverDiagnostics> {
        None
    }
}
