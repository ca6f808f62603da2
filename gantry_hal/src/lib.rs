//! # Gantry HAL Library
//!
//! GPIO line abstraction with a pluggable driver architecture.
//!
//! Drivers implement the `GpioDriver` trait defined in
//! `gantry_common::hal::driver`. `HalCore` loads one driver, claims every
//! line of the station once, and hands them out as typed wrappers.
//!
//! # Module Structure
//!
//! - [`core`] - HalCore struct, driver lifecycle, line acquisition
//! - [`drivers`] - GPIO driver implementations, selected by name
//! - [`lines`] - Typed line wrappers (`DriveLine`, `LimitSensor`)
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                       gantry_hal                                 │
//! │  ┌──────────────┐    ┌──────────────┐    ┌────────────────────┐  │
//! │  │ GantryLines  │◄───│   HalCore    │───►│ drivers::create_   │  │
//! │  │ (scoped)     │    │              │    │ driver(name)       │  │
//! │  └──────────────┘    └──────┬───────┘    └────────────────────┘  │
//! │                             │                                    │
//! │                             ▼                                    │
//! │                    ┌────────────────┐                            │
//! │                    │  GpioDriver    │ (trait object)             │
//! │                    │  sim / rpi     │                            │
//! │                    └────────────────┘                            │
//! └──────────────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]

pub mod core;
pub mod drivers;
pub mod lines;

pub use crate::core::HalCore;
pub use crate::drivers::available as available_drivers;
pub use crate::lines::{AxisLines, DriveLine, GantryLines, LimitSensor, SensorBank};
