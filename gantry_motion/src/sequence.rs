//! Four-position sequencing.
//!
//! Corner positions are defined by the pair of limit sensors that bound
//! them. Reaching a position means homing X onto its sensor, then Y onto
//! its sensor. The full run visits `P1, P2, P3, P4` and returns to `P1`,
//! optionally taking one still at each of the four corners.

use crate::capture::{CaptureDevice, CaptureError};
use crate::error::{MotionError, SequenceError};
use crate::gantry::Gantry;
use crate::homing::HomingReport;
use gantry_common::motion::{AxisId, CaptureFailurePolicy, Direction, LimitEnd, SensorId};
use std::fmt;
use tracing::{error, info, warn};

// ─── Positions ──────────────────────────────────────────────────────

/// One homing move: drive `axis` in `direction` until `sensor` triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HomingTarget {
    pub axis: AxisId,
    pub direction: Direction,
    pub sensor: SensorId,
}

impl HomingTarget {
    /// Target for the limit at `end` of `axis`.
    pub const fn limit(axis: AxisId, end: LimitEnd) -> Self {
        Self {
            axis,
            direction: end.approach_direction(),
            sensor: SensorId::new(axis, end),
        }
    }
}

/// Gantry corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    /// X-min, Y-min
    P1,
    /// X-min, Y-max
    P2,
    /// X-max, Y-min
    P3,
    /// X-max, Y-max
    P4,
}

/// Corners in capture order.
pub const CAPTURE_POSITIONS: [Position; 4] = [Position::P1, Position::P2, Position::P3, Position::P4];

/// Every move of a full run: the capture corners, then back to P1.
pub const FULL_SEQUENCE: [Position; 5] = [
    Position::P1,
    Position::P2,
    Position::P3,
    Position::P4,
    Position::P1,
];

impl Position {
    /// 1-based index.
    pub const fn index(&self) -> usize {
        match self {
            Position::P1 => 1,
            Position::P2 => 2,
            Position::P3 => 3,
            Position::P4 => 4,
        }
    }

    /// Homing moves, X first.
    pub const fn targets(&self) -> [HomingTarget; 2] {
        let (x_end, y_end) = match self {
            Position::P1 => (LimitEnd::Min, LimitEnd::Min),
            Position::P2 => (LimitEnd::Min, LimitEnd::Max),
            Position::P3 => (LimitEnd::Max, LimitEnd::Min),
            Position::P4 => (LimitEnd::Max, LimitEnd::Max),
        };
        [
            HomingTarget::limit(AxisId::X, x_end),
            HomingTarget::limit(AxisId::Y, y_end),
        ]
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.index())
    }
}

// ─── Results ────────────────────────────────────────────────────────

/// Encoded still taken at a corner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedImage {
    /// 1-based position index.
    pub position_index: usize,
    pub bytes: Vec<u8>,
}

/// Record of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequenceReport {
    /// Positions reached, in order.
    pub visited: Vec<Position>,
    /// Every homing move, in order.
    pub homings: Vec<HomingReport>,
    /// Stills, one per corner, when a capture device was supplied.
    pub images: Vec<CapturedImage>,
}

impl SequenceReport {
    pub fn total_steps(&self) -> u64 {
        self.homings.iter().map(|h| h.steps).sum()
    }
}

// ─── Sequencer ──────────────────────────────────────────────────────

#[derive(Debug)]
pub struct PositionSequencer {
    gantry: Gantry,
    on_capture_failure: CaptureFailurePolicy,
}

impl PositionSequencer {
    pub fn new(gantry: Gantry, on_capture_failure: CaptureFailurePolicy) -> Self {
        Self {
            gantry,
            on_capture_failure,
        }
    }

    pub fn gantry(&self) -> &Gantry {
        &self.gantry
    }

    /// Home X onto the position's X sensor, then Y onto its Y sensor.
    pub fn move_to(&mut self, position: Position) -> Result<[HomingReport; 2], MotionError> {
        let [tx, ty] = position.targets();
        let x = self.gantry.home(tx.axis, tx.direction, tx.sensor)?;
        let y = self.gantry.home(ty.axis, ty.direction, ty.sensor)?;
        info!("Position {} reached ({} + {} steps)", position.index(), x.steps, y.steps);
        Ok([x, y])
    }

    /// Visit P1..P4, capturing at each if `capture` is given, then return to P1.
    ///
    /// # Errors
    /// - `SequenceError::Motion` if a homing move fails; the run stops there
    /// - `SequenceError::Capture` if a still fails; remaining captures are
    ///   skipped and no images are returned. The carriage is returned to P1
    ///   only under `CaptureFailurePolicy::ReturnToOrigin`.
    pub fn run_full_sequence(
        &mut self,
        mut capture: Option<&mut dyn CaptureDevice>,
    ) -> Result<SequenceReport, SequenceError> {
        let mut report = SequenceReport::default();

        for (step, position) in FULL_SEQUENCE.into_iter().enumerate() {
            report.homings.extend(self.move_to(position)?);
            report.visited.push(position);

            // the closing move back to P1 takes no still
            if step >= CAPTURE_POSITIONS.len() {
                continue;
            }
            let Some(device) = capture.as_deref_mut() else {
                continue;
            };
            match capture_one(device) {
                Ok(bytes) => {
                    info!("Captured image at position {} ({} bytes)", position.index(), bytes.len());
                    report.images.push(CapturedImage {
                        position_index: position.index(),
                        bytes,
                    });
                }
                Err(source) => {
                    error!("Capture at position {} failed: {}", position.index(), source);
                    self.after_capture_failure();
                    return Err(SequenceError::Capture {
                        position_index: position.index(),
                        source,
                    });
                }
            }
        }

        info!(
            "Sequence complete: {} moves, {} steps, {} images",
            report.visited.len(),
            report.total_steps(),
            report.images.len()
        );
        Ok(report)
    }

    /// Full run without captures.
    pub fn run_motion_sequence(&mut self) -> Result<SequenceReport, SequenceError> {
        self.run_full_sequence(None)
    }

    /// Full run with one still per corner; exactly four images on success.
    pub fn run_capture_sequence(
        &mut self,
        device: &mut dyn CaptureDevice,
    ) -> Result<Vec<CapturedImage>, SequenceError> {
        self.run_full_sequence(Some(device)).map(|report| report.images)
    }

    fn after_capture_failure(&mut self) {
        if self.on_capture_failure != CaptureFailurePolicy::ReturnToOrigin {
            return;
        }
        info!("Returning to position 1 after capture failure");
        if let Err(e) = self.move_to(Position::P1) {
            warn!("Return to position 1 failed: {}", e);
        }
    }
}

fn capture_one(device: &mut dyn CaptureDevice) -> Result<Vec<u8>, CaptureError> {
    let bytes = device.capture_still()?;
    if bytes.is_empty() {
        return Err(CaptureError::EncodeFailed("encoder produced no data".to_string()));
    }
    Ok(bytes)
}
