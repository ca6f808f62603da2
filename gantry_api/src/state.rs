//! Shared station state.
//!
//! One `Station` owns the sequencer and the camera. Requests take the
//! mutex on a blocking worker, so runs never overlap and homing never
//! blocks the async executor.

use crate::error::ApiError;
use gantry_motion::{CaptureDevice, CapturedImage, PositionSequencer, SequenceError, SequenceReport};
use parking_lot::Mutex;
use std::sync::Arc;

pub type SharedStation = Arc<Mutex<Station>>;

pub struct Station {
    sequencer: PositionSequencer,
    camera: Box<dyn CaptureDevice>,
}

impl Station {
    pub fn new(sequencer: PositionSequencer, camera: Box<dyn CaptureDevice>) -> Self {
        Self { sequencer, camera }
    }

    pub fn shared(self) -> SharedStation {
        Arc::new(Mutex::new(self))
    }

    /// Full motion run, no captures.
    pub fn move_motors(&mut self) -> Result<SequenceReport, SequenceError> {
        self.sequencer.run_motion_sequence()
    }

    /// Full run with one still per corner.
    pub fn capture_images(&mut self) -> Result<Vec<CapturedImage>, SequenceError> {
        self.sequencer.run_capture_sequence(&mut *self.camera)
    }
}

/// Run `f` against the station on the blocking pool.
pub async fn with_station<T, F>(station: SharedStation, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&mut Station) -> Result<T, SequenceError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut guard = station.lock();
        f(&mut guard)
    })
    .await
    .map_err(|e| ApiError::Worker(e.to_string()))?
    .map_err(ApiError::from)
}
