//! OpenCV still capture.

use crate::error::CameraError;
use gantry_common::config::CameraConfig;
use gantry_motion::{CaptureDevice, CaptureError};
use opencv::core::{Mat, Vector};
use opencv::videoio::VideoCapture;
use opencv::{imgcodecs, prelude::*, videoio};
use tracing::{info, warn};

pub struct OpenCvCamera {
    index: i32,
    cam: VideoCapture,
}

impl OpenCvCamera {
    /// Open device `config.index` at the configured resolution.
    pub fn open(config: &CameraConfig) -> Result<Self, CameraError> {
        let index = config.index;
        let failed = |e: opencv::Error| CameraError::OpenFailed {
            index,
            reason: e.to_string(),
        };

        let mut cam = VideoCapture::new(index, videoio::CAP_ANY).map_err(failed)?;
        if !VideoCapture::is_opened(&cam).map_err(failed)? {
            return Err(CameraError::OpenFailed {
                index,
                reason: "device did not open".to_string(),
            });
        }
        cam.set(videoio::CAP_PROP_FRAME_WIDTH, f64::from(config.width))
            .map_err(failed)?;
        cam.set(videoio::CAP_PROP_FRAME_HEIGHT, f64::from(config.height))
            .map_err(failed)?;

        info!(
            "OpenCVCamera: {}, Backend: {}, requested {}x{}, got {}x{}",
            index,
            cam.get_backend_name().unwrap_or("Unknown".to_string()),
            config.width,
            config.height,
            cam.get(videoio::CAP_PROP_FRAME_WIDTH).unwrap_or(0.0),
            cam.get(videoio::CAP_PROP_FRAME_HEIGHT).unwrap_or(0.0)
        );

        Ok(Self { index, cam })
    }
}

impl CaptureDevice for OpenCvCamera {
    fn capture_still(&mut self) -> Result<Vec<u8>, CaptureError> {
        if !self.cam.is_opened().unwrap_or(false) {
            return Err(CaptureError::DeviceClosed);
        }

        let mut frame = Mat::default();
        let grabbed = self
            .cam
            .read(&mut frame)
            .map_err(|e| CaptureError::FrameReadFailed(e.to_string()))?;
        if !grabbed || frame.empty() {
            return Err(CaptureError::FrameReadFailed(format!(
                "no frame from camera {}",
                self.index
            )));
        }

        let mut buffer = Vector::<u8>::new();
        let encoded = imgcodecs::imencode(".jpg", &frame, &mut buffer, &Vector::new())
            .map_err(|e| CaptureError::EncodeFailed(e.to_string()))?;
        if !encoded {
            return Err(CaptureError::EncodeFailed("imencode returned false".to_string()));
        }
        Ok(buffer.to_vec())
    }
}

impl Drop for OpenCvCamera {
    fn drop(&mut self) {
        if let Err(e) = self.cam.release() {
            warn!("OpenCVCamera: {}, release failed: {}", self.index, e);
        } else {
            info!("OpenCVCamera: {}, released", self.index);
        }
    }
}
