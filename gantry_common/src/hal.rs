//! Hardware abstraction layer contract and configuration.
//!
//! This module contains the driver and line traits implemented by HAL
//! drivers, together with the `[hal]` configuration section.

pub mod config;
pub mod driver;
pub mod types;
