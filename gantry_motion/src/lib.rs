//! # Gantry Motion Library
//!
//! Blocking motion control for the two-axis camera gantry.
//!
//! ## Layers
//!
//! 1. **AxisDriver**: direction level + step pulses for one motor
//! 2. **HomingController**: drive one axis until a limit sensor triggers
//! 3. **PositionSequencer**: the four corner positions and the full
//!    `P1 → P2 → P3 → P4 → P1` run, with an optional capture at each corner
//!
//! Hardware lines come from `gantry_hal::HalCore::claim_lines()` and are
//! owned by a [`Gantry`] context for the lifetime of the process.
//! Everything here blocks the calling thread; async callers run it on a
//! blocking worker.

pub mod axis;
pub mod capture;
pub mod error;
pub mod gantry;
pub mod homing;
pub mod sequence;

pub use axis::AxisDriver;
pub use capture::{CaptureDevice, CaptureError};
pub use error::{MotionError, SequenceError};
pub use gantry::Gantry;
pub use homing::{HomingController, HomingReport, HomingState};
pub use sequence::{
    CAPTURE_POSITIONS, CapturedImage, FULL_SEQUENCE, HomingTarget, Position, PositionSequencer,
    SequenceReport,
};
