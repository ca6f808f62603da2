//! Capture collaborator.
//!
//! The sequencer only needs "take one still, give me encoded bytes".
//! Camera backends live outside this crate.

use thiserror::Error;

/// Why a still could not be produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    /// Device not open (or no device configured).
    #[error("camera device is not open")]
    DeviceClosed,

    /// Grabbing a frame failed.
    #[error("frame read failed: {0}")]
    FrameReadFailed(String),

    /// Encoding the frame failed.
    #[error("image encoding failed: {0}")]
    EncodeFailed(String),
}

/// Produces one encoded still image per call.
pub trait CaptureDevice: Send {
    fn capture_still(&mut self) -> Result<Vec<u8>, CaptureError>;
}
