//! Camera backends.
//!
//! - [`simulation::SimulatedCamera`] - placeholder JPEG-framed stills
//! - `opencv_capture::OpenCvCamera` - OpenCV `VideoCapture` (feature `opencv-capture`)
//! - [`Unavailable`] - no camera configured; every capture reports a closed device
//!
//! The camera is opened once at startup by [`open_camera`]; a failure there
//! is fatal.

#[cfg(feature = "opencv-capture")]
pub mod opencv_capture;
pub mod simulation;

use crate::error::CameraError;
use gantry_common::config::{CameraConfig, CameraSourceKind};
use gantry_motion::{CaptureDevice, CaptureError};
use tracing::{info, warn};

/// Capture device used when `source = "none"`.
#[derive(Debug, Default)]
pub struct Unavailable;

impl CaptureDevice for Unavailable {
    fn capture_still(&mut self) -> Result<Vec<u8>, CaptureError> {
        Err(CaptureError::DeviceClosed)
    }
}

/// Open the configured camera.
pub fn open_camera(config: &CameraConfig) -> Result<Box<dyn CaptureDevice>, CameraError> {
    match config.source {
        CameraSourceKind::None => {
            warn!("No camera configured; image requests will fail");
            Ok(Box::new(Unavailable))
        }
        CameraSourceKind::Simulation => {
            info!("Using simulated camera ({}x{})", config.width, config.height);
            Ok(Box::new(simulation::SimulatedCamera::new(
                config.width,
                config.height,
            )))
        }
        CameraSourceKind::OpenCv => open_opencv(config),
    }
}

#[cfg(feature = "opencv-capture")]
fn open_opencv(config: &CameraConfig) -> Result<Box<dyn CaptureDevice>, CameraError> {
    Ok(Box::new(opencv_capture::OpenCvCamera::open(config)?))
}

#[cfg(not(feature = "opencv-capture"))]
fn open_opencv(_config: &CameraConfig) -> Result<Box<dyn CaptureDevice>, CameraError> {
    Err(CameraError::Unsupported("opencv"))
}
