//! Motion vocabulary shared by HAL and motion crates.
//!
//! Defines `AxisId`, `Direction`, `LimitEnd`, `SensorId` and the
//! `CaptureFailurePolicy` used by the position sequencer.

use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

// ─── AxisId ─────────────────────────────────────────────────────────

/// Physical axis of the gantry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum AxisId {
    X = 0,
    Y = 1,
}

impl AxisId {
    /// Both axes in command order (X always before Y).
    pub const ALL: [AxisId; 2] = [AxisId::X, AxisId::Y];
}

impl fmt::Display for AxisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "X"),
            Self::Y => write!(f, "Y"),
        }
    }
}

// ─── Direction ──────────────────────────────────────────────────────

/// Travel direction of an axis.
///
/// Semantic replacement for the raw direction-line level; the mapping to an
/// electrical level happens only inside the axis driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    /// Toward the max limit sensor.
    Positive = 0,
    /// Toward the min limit sensor.
    Negative = 1,
}

impl Direction {
    /// The limit end reached by travelling in this direction.
    #[inline]
    pub const fn limit_end(&self) -> LimitEnd {
        match self {
            Self::Positive => LimitEnd::Max,
            Self::Negative => LimitEnd::Min,
        }
    }
}

// ─── LimitEnd ───────────────────────────────────────────────────────

/// End of travel guarded by a limit sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum LimitEnd {
    Min = 0,
    Max = 1,
}

impl LimitEnd {
    /// Direction an axis must travel to reach this end.
    /// Min is always approached Negative, Max always Positive.
    #[inline]
    pub const fn approach_direction(&self) -> Direction {
        match self {
            Self::Min => Direction::Negative,
            Self::Max => Direction::Positive,
        }
    }
}

impl fmt::Display for LimitEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Min => write!(f, "min"),
            Self::Max => write!(f, "max"),
        }
    }
}

// ─── SensorId ───────────────────────────────────────────────────────

/// Identity of a limit sensor: which axis, which end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SensorId {
    pub axis: AxisId,
    pub end: LimitEnd,
}

impl SensorId {
    pub const X_MIN: SensorId = SensorId::new(AxisId::X, LimitEnd::Min);
    pub const X_MAX: SensorId = SensorId::new(AxisId::X, LimitEnd::Max);
    pub const Y_MIN: SensorId = SensorId::new(AxisId::Y, LimitEnd::Min);
    pub const Y_MAX: SensorId = SensorId::new(AxisId::Y, LimitEnd::Max);

    /// All four sensors.
    pub const ALL: [SensorId; 4] = [Self::X_MIN, Self::X_MAX, Self::Y_MIN, Self::Y_MAX];

    pub const fn new(axis: AxisId, end: LimitEnd) -> Self {
        Self { axis, end }
    }
}

impl fmt::Display for SensorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.axis, self.end)
    }
}

// ─── CaptureFailurePolicy ───────────────────────────────────────────

/// What the sequencer does with the carriage after a capture failure.
///
/// The image set is aborted in both cases; only the return-to-origin move
/// differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureFailurePolicy {
    /// Stop where the failure happened.
    #[default]
    Abort,
    /// Still drive back to P1 before reporting the failure.
    ReturnToOrigin,
}

impl FromStr for CaptureFailurePolicy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "abort" => Ok(Self::Abort),
            "return_to_origin" => Ok(Self::ReturnToOrigin),
            _ => Err(format!(
                "unknown CaptureFailurePolicy: {s:?}, expected \"abort\" or \"return_to_origin\""
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_is_negative_max_is_positive() {
        for axis in AxisId::ALL {
            let min = SensorId::new(axis, LimitEnd::Min);
            let max = SensorId::new(axis, LimitEnd::Max);
            assert_eq!(min.end.approach_direction(), Direction::Negative);
            assert_eq!(max.end.approach_direction(), Direction::Positive);
        }
    }

    #[test]
    fn test_direction_limit_end_round_trip() {
        assert_eq!(Direction::Positive.limit_end(), LimitEnd::Max);
        assert_eq!(Direction::Negative.limit_end(), LimitEnd::Min);
    }

    #[test]
    fn test_sensor_display() {
        assert_eq!(SensorId::X_MIN.to_string(), "X-min");
        assert_eq!(SensorId::Y_MAX.to_string(), "Y-max");
    }

    #[test]
    fn test_capture_failure_policy_from_str() {
        assert_eq!(
            "abort".parse::<CaptureFailurePolicy>(),
            Ok(CaptureFailurePolicy::Abort)
        );
        assert_eq!(
            "return_to_origin".parse::<CaptureFailurePolicy>(),
            Ok(CaptureFailurePolicy::ReturnToOrigin)
        );
        assert!("retry".parse::<CaptureFailurePolicy>().is_err());
        assert_eq!(CaptureFailurePolicy::default(), CaptureFailurePolicy::Abort);
    }
}
