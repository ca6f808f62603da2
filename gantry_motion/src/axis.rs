//! Axis driver.
//!
//! Owns the direction and step outputs of one stepper. `Direction` is
//! translated to a line level here and nowhere else: `Positive` drives
//! the direction line high (toward the max sensor).

use gantry_common::hal::types::Level;
use gantry_common::motion::{AxisId, Direction};
use gantry_hal::AxisLines;
use std::time::Duration;

/// Level of the direction line for a travel direction.
#[inline]
pub const fn direction_level(direction: Direction) -> Level {
    match direction {
        Direction::Positive => Level::High,
        Direction::Negative => Level::Low,
    }
}

/// One stepper motor.
#[derive(Debug)]
pub struct AxisDriver {
    lines: AxisLines,
    step_delay: Duration,
    pulses: u64,
}

impl AxisDriver {
    /// `step_delay` is the half period: high time and low time of a pulse.
    pub fn new(lines: AxisLines, step_delay: Duration) -> Self {
        Self {
            lines,
            step_delay,
            pulses: 0,
        }
    }

    pub fn axis(&self) -> AxisId {
        self.lines.axis
    }

    /// Drive the direction line.
    pub fn set_direction(&mut self, direction: Direction) {
        self.lines.dir.set(direction_level(direction));
    }

    /// One full step pulse: high, wait, low, wait.
    pub fn pulse_step(&mut self) {
        self.lines.step.set_high();
        pause(self.step_delay);
        self.lines.step.set_low();
        pause(self.step_delay);
        self.pulses += 1;
    }

    /// Pulses issued since construction.
    pub fn pulses_issued(&self) -> u64 {
        self.pulses
    }
}

#[inline]
fn pause(delay: Duration) {
    if !delay.is_zero() {
        std::thread::sleep(delay);
    }
}
