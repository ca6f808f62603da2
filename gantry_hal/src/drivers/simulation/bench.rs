//! Simulated gantry bench.
//!
//! Two carriages on lead screws, each between a min and a max limit
//! switch. A rising edge on an axis step line moves that carriage one
//! step in the direction selected by its direction line (high = toward
//! max). Positions are clamped to `[0, travel]`; a limit input reads low
//! while its carriage sits at that end.

use gantry_common::hal::config::{HalConfig, PinMap};
use gantry_common::hal::types::Level;
use gantry_common::motion::{AxisId, LimitEnd, SensorId};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::trace;

/// Observable bench activity, recorded when enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BenchEvent {
    /// An output line was driven.
    Output {
        /// BCM pin
        pin: u8,
        /// New level
        level: Level,
    },
}

#[derive(Debug, Clone, Copy)]
struct Carriage {
    position: u32,
    travel: u32,
    steps_taken: u64,
}

/// Bench state shared between the driver, its lines and test handles.
#[derive(Debug)]
pub struct SimBench {
    pins: PinMap,
    carriages: [Carriage; 2],
    outputs: HashMap<u8, Level>,
    claimed_outputs: HashSet<u8>,
    claimed_inputs: HashSet<u8>,
    stuck_high: HashSet<u8>,
    events: Option<Vec<BenchEvent>>,
}

fn axis_index(axis: AxisId) -> usize {
    match axis {
        AxisId::X => 0,
        AxisId::Y => 1,
    }
}

impl SimBench {
    /// Build a bench for the given configuration.
    pub fn new(config: &HalConfig) -> Self {
        let carriage = |axis: AxisId| {
            let travel = config.simulation.travel(axis);
            Carriage {
                position: config.simulation.start(axis).min(travel),
                travel,
                steps_taken: 0,
            }
        };
        Self {
            pins: config.pins,
            carriages: [carriage(AxisId::X), carriage(AxisId::Y)],
            outputs: HashMap::new(),
            claimed_outputs: HashSet::new(),
            claimed_inputs: HashSet::new(),
            stuck_high: HashSet::new(),
            events: None,
        }
    }

    /// Drive an output and advance the carriage on a step rising edge.
    pub fn write_output(&mut self, pin: u8, level: Level) {
        let previous = self.outputs.insert(pin, level).unwrap_or(Level::Low);
        if let Some(events) = self.events.as_mut() {
            events.push(BenchEvent::Output { pin, level });
        }

        let Some(axis) = AxisId::ALL
            .into_iter()
            .find(|&a| self.pins.step_pin(a) == pin)
        else {
            return;
        };
        if previous.is_high() || !level.is_high() {
            return;
        }

        let toward_max = self
            .outputs
            .get(&self.pins.dir_pin(axis))
            .copied()
            .unwrap_or_default()
            .is_high();
        let carriage = &mut self.carriages[axis_index(axis)];
        carriage.steps_taken += 1;
        carriage.position = if toward_max {
            (carriage.position + 1).min(carriage.travel)
        } else {
            carriage.position.saturating_sub(1)
        };
        trace!("Bench axis {} at {}", axis, carriage.position);
    }

    /// Level of a pull-up input. Unknown pins float high.
    pub fn read_input(&self, pin: u8) -> bool {
        if self.stuck_high.contains(&pin) {
            return true;
        }
        let Some(sensor) = SensorId::ALL
            .into_iter()
            .find(|&s| self.pins.sensor_pin(s) == pin)
        else {
            return true;
        };
        let carriage = &self.carriages[axis_index(sensor.axis)];
        let at_end = match sensor.end {
            LimitEnd::Min => carriage.position == 0,
            LimitEnd::Max => carriage.position >= carriage.travel,
        };
        !at_end
    }

    /// Last level driven on an output.
    pub fn output_level(&self, pin: u8) -> Option<Level> {
        self.outputs.get(&pin).copied()
    }

    pub(crate) fn claim_output(&mut self, pin: u8) -> bool {
        if self.claimed_outputs.contains(&pin) || self.claimed_inputs.contains(&pin) {
            return false;
        }
        self.claimed_outputs.insert(pin);
        self.outputs.insert(pin, Level::Low);
        true
    }

    pub(crate) fn claim_input(&mut self, pin: u8) -> bool {
        if self.claimed_outputs.contains(&pin) || self.claimed_inputs.contains(&pin) {
            return false;
        }
        self.claimed_inputs.insert(pin);
        true
    }

    pub(crate) fn release_output(&mut self, pin: u8) {
        self.write_output(pin, Level::Low);
        self.claimed_outputs.remove(&pin);
    }

    pub(crate) fn release_input(&mut self, pin: u8) {
        self.claimed_inputs.remove(&pin);
    }

    pub(crate) fn claimed_counts(&self) -> (usize, usize) {
        (self.claimed_outputs.len(), self.claimed_inputs.len())
    }

    fn carriage(&self, axis: AxisId) -> &Carriage {
        &self.carriages[axis_index(axis)]
    }
}

// ─── SimHandle ──────────────────────────────────────────────────────

/// Shared handle on the bench for inspection and fault injection.
#[derive(Debug, Clone)]
pub struct SimHandle(Arc<Mutex<SimBench>>);

impl SimHandle {
    pub(crate) fn new(bench: SimBench) -> Self {
        Self(Arc::new(Mutex::new(bench)))
    }

    pub(crate) fn with<R>(&self, f: impl FnOnce(&mut SimBench) -> R) -> R {
        f(&mut self.0.lock())
    }

    /// Carriage position in steps from the min end.
    pub fn position(&self, axis: AxisId) -> u32 {
        self.0.lock().carriage(axis).position
    }

    /// Move a carriage by hand. Clamped to its travel.
    pub fn set_position(&self, axis: AxisId, steps: u32) {
        let mut bench = self.0.lock();
        let carriage = &mut bench.carriages[axis_index(axis)];
        carriage.position = steps.min(carriage.travel);
    }

    /// Configured travel of an axis.
    pub fn travel(&self, axis: AxisId) -> u32 {
        self.0.lock().carriage(axis).travel
    }

    /// Step pulses seen on an axis since init (including clamped ones).
    pub fn steps_taken(&self, axis: AxisId) -> u64 {
        self.0.lock().carriage(axis).steps_taken
    }

    /// Make a sensor read high (not triggered) regardless of position.
    pub fn disconnect_sensor(&self, sensor: SensorId) {
        let mut bench = self.0.lock();
        let pin = bench.pins.sensor_pin(sensor);
        bench.stuck_high.insert(pin);
    }

    /// Undo `disconnect_sensor`.
    pub fn reconnect_sensor(&self, sensor: SensorId) {
        let mut bench = self.0.lock();
        let pin = bench.pins.sensor_pin(sensor);
        bench.stuck_high.remove(&pin);
    }

    /// Start (or restart) recording output events.
    pub fn start_recording(&self) {
        self.0.lock().events = Some(Vec::new());
    }

    /// Drain recorded events. Recording stays enabled.
    pub fn take_events(&self) -> Vec<BenchEvent> {
        self.0
            .lock()
            .events
            .as_mut()
            .map(std::mem::take)
            .unwrap_or_default()
    }

    /// Last level driven on an output.
    pub fn output_level(&self, pin: u8) -> Option<Level> {
        self.0.lock().output_level(pin)
    }

    /// Whether a pin is currently claimed (as input or output).
    pub fn is_claimed(&self, pin: u8) -> bool {
        let bench = self.0.lock();
        bench.claimed_outputs.contains(&pin) || bench.claimed_inputs.contains(&pin)
    }

    /// Pin map in use.
    pub fn pins(&self) -> PinMap {
        self.0.lock().pins
    }
}
