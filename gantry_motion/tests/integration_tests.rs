//! Integration tests for gantry motion.
//!
//! These run the axis driver, homing controller and sequencer against the
//! simulated gantry bench from `gantry_hal`.

mod integration;
