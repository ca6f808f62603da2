//! Typed line wrappers.
//!
//! Raw driver lines are wrapped so that:
//! - every output is driven low and released when its owner goes away
//!   (`DriveLine` implements `Drop`), on every exit path that unwinds;
//! - limit inputs expose an "at limit" capability instead of a level.
//!   Sensors are wired with pull-up bias and are active-low, so an
//!   untriggered or unconnected sensor reads high.

use gantry_common::hal::driver::{InputLine, OutputLine};
use gantry_common::hal::types::Level;
use gantry_common::motion::{AxisId, LimitEnd, SensorId};
use tracing::trace;

// ─── DriveLine ──────────────────────────────────────────────────────

/// Exclusively owned digital output.
pub struct DriveLine {
    line: Box<dyn OutputLine>,
    level: Level,
}

impl DriveLine {
    /// Wrap a freshly claimed output (claimed low).
    pub fn new(line: Box<dyn OutputLine>) -> Self {
        Self {
            line,
            level: Level::Low,
        }
    }

    /// BCM pin number.
    pub fn pin(&self) -> u8 {
        self.line.pin()
    }

    /// Drive the line.
    #[inline]
    pub fn set(&mut self, level: Level) {
        self.line.set_level(level);
        self.level = level;
    }

    /// Drive high.
    #[inline]
    pub fn set_high(&mut self) {
        self.set(Level::High);
    }

    /// Drive low.
    #[inline]
    pub fn set_low(&mut self) {
        self.set(Level::Low);
    }

    /// Last commanded level.
    pub fn level(&self) -> Level {
        self.level
    }
}

impl Drop for DriveLine {
    fn drop(&mut self) {
        trace!("Releasing output line {}", self.line.pin());
        self.line.release();
    }
}

impl std::fmt::Debug for DriveLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriveLine")
            .field("pin", &self.pin())
            .field("level", &self.level)
            .finish()
    }
}

// ─── LimitSensor ────────────────────────────────────────────────────

/// End-of-travel detector.
pub struct LimitSensor {
    id: SensorId,
    line: Box<dyn InputLine>,
}

impl LimitSensor {
    /// Wrap a claimed pull-up input.
    pub fn new(id: SensorId, line: Box<dyn InputLine>) -> Self {
        Self { id, line }
    }

    /// Which axis and end this sensor guards.
    pub fn id(&self) -> SensorId {
        self.id
    }

    /// BCM pin number.
    pub fn pin(&self) -> u8 {
        self.line.pin()
    }

    /// True when the carriage sits on the switch (line pulled low).
    #[inline]
    pub fn at_limit(&self) -> bool {
        !self.line.is_high()
    }
}

impl std::fmt::Debug for LimitSensor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LimitSensor")
            .field("id", &self.id)
            .field("pin", &self.pin())
            .finish()
    }
}

// ─── Groupings ──────────────────────────────────────────────────────

/// Direction and step outputs of one axis.
#[derive(Debug)]
pub struct AxisLines {
    /// Axis identity.
    pub axis: AxisId,
    /// Direction line.
    pub dir: DriveLine,
    /// Step line.
    pub step: DriveLine,
}

/// The four limit sensors of the gantry, one slot per axis end.
#[derive(Debug)]
pub struct SensorBank {
    x_min: LimitSensor,
    x_max: LimitSensor,
    y_min: LimitSensor,
    y_max: LimitSensor,
}

impl SensorBank {
    /// Build a bank by producing the input line for each sensor, in
    /// `SensorId::ALL` order. Stops at the first error; lines already
    /// produced are dropped.
    pub fn try_from_fn<E>(
        mut line_for: impl FnMut(SensorId) -> Result<Box<dyn InputLine>, E>,
    ) -> Result<Self, E> {
        let mut sensor = |id: SensorId| line_for(id).map(|line| LimitSensor::new(id, line));
        Ok(Self {
            x_min: sensor(SensorId::X_MIN)?,
            x_max: sensor(SensorId::X_MAX)?,
            y_min: sensor(SensorId::Y_MIN)?,
            y_max: sensor(SensorId::Y_MAX)?,
        })
    }

    /// Look up a sensor by identity.
    pub fn get(&self, id: SensorId) -> &LimitSensor {
        match (id.axis, id.end) {
            (AxisId::X, LimitEnd::Min) => &self.x_min,
            (AxisId::X, LimitEnd::Max) => &self.x_max,
            (AxisId::Y, LimitEnd::Min) => &self.y_min,
            (AxisId::Y, LimitEnd::Max) => &self.y_max,
        }
    }

    /// Iterate all sensors in `SensorId::ALL` order.
    pub fn iter(&self) -> impl Iterator<Item = &LimitSensor> {
        [&self.x_min, &self.x_max, &self.y_min, &self.y_max].into_iter()
    }
}

/// Every line of the station, claimed once at startup.
#[derive(Debug)]
pub struct GantryLines {
    /// X axis outputs.
    pub x: AxisLines,
    /// Y axis outputs.
    pub y: AxisLines,
    /// Limit sensors.
    pub sensors: SensorBank,
}
