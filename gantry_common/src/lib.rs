//! Gantry Common Library
//!
//! Shared constants, configuration loading, the HAL driver contract and the
//! motion vocabulary used by every crate of the gantry station.
//!
//! # Module Structure
//!
//! - [`config`] - Configuration loading traits and the station config tree
//! - [`consts`] - Default pin map, timing and geometry constants
//! - [`hal`] - HAL driver trait, line traits, HAL configuration
//! - [`motion`] - Axis, direction and limit-sensor identities
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use gantry_common::prelude::*;
//!
//! let config = GantryConfig::default();
//! assert!(config.validate().is_ok());
//! ```

pub mod config;
pub mod consts;
pub mod hal;
pub mod motion;
pub mod prelude;
