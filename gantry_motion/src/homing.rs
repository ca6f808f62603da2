//! Sensor-gated homing.
//!
//! Drives one axis in one direction until the limit sensor at that end
//! reports "at limit". The sensor is read before every pulse, so an axis
//! already sitting on its switch takes zero steps.
//!
//! ## Lifecycle
//!
//! 1. `home()` validates that the sensor guards the driven axis at the
//!    driven end; a mismatch is rejected before any line is touched
//! 2. Idle → Stepping: direction line set once
//! 3. One pulse per non-triggered read
//! 4. First triggered read: Stepping → Reached
//! 5. Step ceiling (if configured) reached first: Stepping → Aborted

use crate::axis::AxisDriver;
use crate::error::MotionError;
use gantry_common::motion::{AxisId, Direction, SensorId};
use gantry_hal::LimitSensor;
use tracing::{debug, trace, warn};

// ─── Homing State ───────────────────────────────────────────────────

/// Phase of the current (or last) homing move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HomingState {
    #[default]
    Idle,
    Stepping,
    Reached,
    /// Step ceiling tripped.
    Aborted,
}

/// Outcome of a completed homing move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HomingReport {
    pub axis: AxisId,
    pub sensor: SensorId,
    pub direction: Direction,
    /// Pulses issued before the sensor triggered.
    pub steps: u64,
}

// ─── Homing Controller ──────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct HomingController {
    state: HomingState,
    step_limit: Option<u64>,
}

impl HomingController {
    /// `step_limit = None` homes without a ceiling.
    pub fn new(step_limit: Option<u64>) -> Self {
        Self {
            state: HomingState::Idle,
            step_limit,
        }
    }

    pub fn state(&self) -> HomingState {
        self.state
    }

    pub fn step_limit(&self) -> Option<u64> {
        self.step_limit
    }

    /// Home `axis` in `direction` until `sensor` triggers.
    ///
    /// # Errors
    /// - `MotionError::SensorMismatch` if `sensor` is not the limit of
    ///   `axis` at the end `direction` points to
    /// - `MotionError::StepLimitExceeded` if the ceiling is reached first
    pub fn home(
        &mut self,
        axis: &mut AxisDriver,
        direction: Direction,
        sensor: &LimitSensor,
    ) -> Result<HomingReport, MotionError> {
        let id = sensor.id();
        if id.axis != axis.axis() || id.end != direction.limit_end() {
            return Err(MotionError::SensorMismatch {
                axis: axis.axis(),
                direction,
                sensor: id,
            });
        }

        self.state = HomingState::Stepping;
        axis.set_direction(direction);
        debug!("Homing axis {} toward {}", axis.axis(), id);

        let mut steps: u64 = 0;
        while !sensor.at_limit() {
            if let Some(limit) = self.step_limit {
                if steps >= limit {
                    self.state = HomingState::Aborted;
                    warn!("Homing toward {} aborted after {} steps", id, steps);
                    return Err(MotionError::StepLimitExceeded { sensor: id, steps });
                }
            }
            axis.pulse_step();
            steps += 1;
            if steps % 1000 == 0 {
                trace!("Homing toward {}: {} steps", id, steps);
            }
        }

        self.state = HomingState::Reached;
        debug!("Reached {} after {} steps", id, steps);
        Ok(HomingReport {
            axis: axis.axis(),
            sensor: id,
            direction,
            steps,
        })
    }
}

impl Default for HomingController {
    fn default() -> Self {
        Self::new(None)
    }
}
