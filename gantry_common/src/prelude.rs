//! Prelude module for common re-exports.
//!
//! ```rust
//! use gantry_common::prelude::*;
//! ```

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{
    ApiConfig, CameraConfig, CameraSourceKind, ConfigError, ConfigLoader, GantryConfig, LogLevel,
    MotionConfig, SharedConfig,
};
pub use crate::hal::config::{HalConfig, PinMap, SimulationConfig};

// ─── HAL ────────────────────────────────────────────────────────────
pub use crate::hal::driver::{
    DriverDiagnostics, GpioDriver, HalError, InputLine, OutputLine,
};
pub use crate::hal::types::Level;

// ─── Motion ─────────────────────────────────────────────────────────
pub use crate::motion::{AxisId, CaptureFailurePolicy, Direction, LimitEnd, SensorId};
