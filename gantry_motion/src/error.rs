//! Motion and sequence errors.

use crate::capture::CaptureError;
use gantry_common::motion::{AxisId, Direction, SensorId};
use thiserror::Error;

/// Errors raised while homing an axis.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MotionError {
    /// The sensor does not guard the driven axis in the driven direction.
    #[error("sensor {sensor} cannot stop axis {axis} moving {direction:?}")]
    SensorMismatch {
        axis: AxisId,
        direction: Direction,
        sensor: SensorId,
    },

    /// Homing step ceiling reached before the sensor triggered.
    #[error("sensor {sensor} not reached after {steps} steps")]
    StepLimitExceeded { sensor: SensorId, steps: u64 },
}

/// Errors raised by a sequence run.
#[derive(Debug, Error)]
pub enum SequenceError {
    #[error(transparent)]
    Motion(#[from] MotionError),

    /// Capture at a corner failed; remaining captures were skipped.
    #[error("capture at position {position_index} failed: {source}")]
    Capture {
        /// 1-based position index.
        position_index: usize,
        #[source]
        source: CaptureError,
    },
}
