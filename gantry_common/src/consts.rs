//! Station-wide constants.
//!
//! Default BCM pin numbers match the reference wiring of the two TB6600
//! drivers and the four limit switches.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

/// Canonical service name (used for logging).
pub const SERVICE_NAME: &str = "gantry";

/// Highest BCM GPIO number exposed on the 40-pin header.
pub const MAX_BCM_PIN: u8 = 27;

// ─── Motor pins ─────────────────────────────────────────────────────

/// Direction control for the X-axis motor.
pub const DEFAULT_X_DIR_PIN: u8 = 5;
/// Step control for the X-axis motor.
pub const DEFAULT_X_STEP_PIN: u8 = 6;
/// Direction control for the Y-axis motor.
pub const DEFAULT_Y_DIR_PIN: u8 = 13;
/// Step control for the Y-axis motor.
pub const DEFAULT_Y_STEP_PIN: u8 = 19;

// ─── Sensor pins ────────────────────────────────────────────────────

/// X-axis minimum limit sensor.
pub const DEFAULT_X_MIN_PIN: u8 = 17;
/// X-axis maximum limit sensor.
pub const DEFAULT_X_MAX_PIN: u8 = 27;
/// Y-axis minimum limit sensor.
pub const DEFAULT_Y_MIN_PIN: u8 = 22;
/// Y-axis maximum limit sensor.
pub const DEFAULT_Y_MAX_PIN: u8 = 4;

// ─── Timing ─────────────────────────────────────────────────────────

/// Half period of a step pulse in microseconds (high time = low time).
/// 500us gives a ~1ms pulse period, i.e. ~1000 steps/s.
pub const DEFAULT_STEP_DELAY_US: u64 = 500;

/// Default homing step ceiling (~200s of travel at 1000 steps/s).
/// A value of 0 in configuration disables the ceiling.
pub const DEFAULT_MAX_HOMING_STEPS: u64 = 200_000;

// ─── Camera ─────────────────────────────────────────────────────────

/// Default capture device index.
pub const DEFAULT_CAMERA_INDEX: i32 = 0;
/// Default still resolution (width).
pub const DEFAULT_CAMERA_WIDTH: u32 = 4504;
/// Default still resolution (height).
pub const DEFAULT_CAMERA_HEIGHT: u32 = 4504;

// ─── API ────────────────────────────────────────────────────────────

/// Default HTTP port.
pub const DEFAULT_HTTP_PORT: u16 = 5000;

/// Default HTTP bind address (all interfaces).
pub const DEFAULT_BIND_ADDR: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, DEFAULT_HTTP_PORT));

// ─── Simulation bench ───────────────────────────────────────────────

/// Default simulated travel per axis, in steps.
pub const DEFAULT_SIM_TRAVEL_STEPS: u32 = 400;
