//! Configuration loading traits and types.
//!
//! This module provides the TOML configuration tree of the gantry station
//! and a standardized way to load it.
//!
//! # Usage
//!
//! ```rust,no_run
//! use gantry_common::config::{ConfigError, GantryConfig};
//! use std::path::Path;
//!
//! fn main() -> Result<(), ConfigError> {
//!     let config = GantryConfig::from_file(Path::new("config/gantry.toml"))?;
//!     println!("Service: {}", config.shared.service_name);
//!     Ok(())
//! }
//! ```

use crate::consts::{
    DEFAULT_BIND_ADDR, DEFAULT_CAMERA_HEIGHT, DEFAULT_CAMERA_INDEX, DEFAULT_CAMERA_WIDTH,
    DEFAULT_MAX_HOMING_STEPS, DEFAULT_STEP_DELAY_US, SERVICE_NAME,
};
use crate::hal::config::HalConfig;
use crate::motion::CaptureFailurePolicy;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Error type for configuration loading operations.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at specified path.
    #[error("Configuration file not found")]
    FileNotFound,

    /// TOML parsing failed.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Semantic validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Log level for application logging.
///
/// Uses lowercase serde values for TOML compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Most verbose, detailed tracing information.
    Trace,
    /// Debug information useful during development.
    Debug,
    /// General information about application operation.
    #[default]
    Info,
    /// Warning messages for potentially problematic situations.
    Warn,
    /// Error messages for serious problems.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Common configuration fields.
///
/// # TOML Example
///
/// ```toml
/// [shared]
/// log_level = "debug"
/// service_name = "gantry-bench-01"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SharedConfig {
    /// Logging verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Application instance identifier.
    pub service_name: String,
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            service_name: SERVICE_NAME.to_string(),
        }
    }
}

impl SharedConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if `service_name` is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.is_empty() {
            return Err(ConfigError::ValidationError(
                "service_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Trait for loading configuration from TOML files.
///
/// Blanket-implemented for every `serde::de::DeserializeOwned` type.
///
/// # Contract
///
/// - Returns `ConfigError::FileNotFound` if the file does not exist
/// - Returns `ConfigError::ParseError` if TOML syntax is invalid
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Load configuration from a TOML file.
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound
            } else {
                ConfigError::ParseError(e.to_string())
            }
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}

// ─── Motion ─────────────────────────────────────────────────────────

/// `[motion]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MotionConfig {
    /// Half period of a step pulse [us].
    pub step_delay_us: u64,
    /// Homing step ceiling per homing move. 0 = unbounded.
    pub max_homing_steps: u64,
    /// Carriage handling after a capture failure.
    pub on_capture_failure: CaptureFailurePolicy,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            step_delay_us: DEFAULT_STEP_DELAY_US,
            max_homing_steps: DEFAULT_MAX_HOMING_STEPS,
            on_capture_failure: CaptureFailurePolicy::default(),
        }
    }
}

impl MotionConfig {
    /// Step half period as a `Duration`.
    pub fn step_delay(&self) -> Duration {
        Duration::from_micros(self.step_delay_us)
    }

    /// Homing step ceiling, `None` when disabled.
    pub fn homing_step_limit(&self) -> Option<u64> {
        (self.max_homing_steps > 0).then_some(self.max_homing_steps)
    }
}

// ─── Camera ─────────────────────────────────────────────────────────

/// Which capture backend to open at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraSourceKind {
    /// No camera; image requests fail as "camera closed".
    None,
    /// Synthetic placeholder frames.
    #[default]
    Simulation,
    /// OpenCV `VideoCapture` (requires the `opencv-capture` feature).
    OpenCv,
}

/// `[camera]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraConfig {
    pub source: CameraSourceKind,
    /// Capture device index.
    pub index: i32,
    pub width: u32,
    pub height: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            source: CameraSourceKind::default(),
            index: DEFAULT_CAMERA_INDEX,
            width: DEFAULT_CAMERA_WIDTH,
            height: DEFAULT_CAMERA_HEIGHT,
        }
    }
}

impl CameraConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ValidationError(format!(
                "camera resolution must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.index < 0 {
            return Err(ConfigError::ValidationError(format!(
                "camera index must be >= 0, got {}",
                self.index
            )));
        }
        Ok(())
    }
}

// ─── API ────────────────────────────────────────────────────────────

fn default_bind() -> SocketAddr {
    DEFAULT_BIND_ADDR
}

/// `[api]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiConfig {
    /// HTTP listen address.
    #[serde(default = "default_bind")]
    pub bind: SocketAddr,
    /// Allow cross-origin requests (credentials included).
    pub cors: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            cors: true,
        }
    }
}

// ─── Station config ─────────────────────────────────────────────────

/// Complete station configuration (`gantry.toml`).
///
/// Every section is optional and falls back to the reference wiring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GantryConfig {
    pub shared: SharedConfig,
    pub hal: HalConfig,
    pub motion: MotionConfig,
    pub camera: CameraConfig,
    pub api: ApiConfig,
}

impl GantryConfig {
    /// Load and validate a station config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::load(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a station config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        self.hal
            .validate()
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;
        self.camera.validate()
    }
}
