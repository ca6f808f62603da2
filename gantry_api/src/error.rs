//! API and camera errors.
//!
//! `ApiError` renders as `{"status":"error","message":...}` with status
//! 500. Capture failures keep the exact messages clients already match on.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use gantry_motion::{CaptureError, MotionError, SequenceError};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Camera could not be brought up at startup.
#[derive(Debug, Error)]
pub enum CameraError {
    #[error("camera {index} could not be opened: {reason}")]
    OpenFailed { index: i32, reason: String },

    #[error("camera source '{0}' is not compiled into this build")]
    Unsupported(&'static str),
}

/// Per-request failure.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Motion(#[from] MotionError),

    /// The blocking worker panicked or was cancelled.
    #[error("worker failed: {0}")]
    Worker(String),
}

impl From<SequenceError> for ApiError {
    fn from(e: SequenceError) -> Self {
        match e {
            SequenceError::Motion(m) => ApiError::Motion(m),
            SequenceError::Capture { source, .. } => ApiError::Capture(source),
        }
    }
}

impl ApiError {
    /// Client-facing message.
    pub fn message(&self) -> String {
        match self {
            ApiError::Capture(CaptureError::DeviceClosed) => "Camera initialization failed.".into(),
            ApiError::Capture(CaptureError::FrameReadFailed(_)) => "Image capture failed.".into(),
            ApiError::Capture(CaptureError::EncodeFailed(_)) => "Image encoding failed.".into(),
            ApiError::Motion(e) => format!("Motor movement failed: {e}."),
            ApiError::Worker(_) => "Internal error.".into(),
        }
    }
}

/// `{"status": ..., "message": ...}` body.
#[derive(Debug, Serialize)]
pub struct StatusMessage {
    pub status: &'static str,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("Request failed: {}", self);
        let body = StatusMessage {
            status: "error",
            message: self.message(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gantry_common::motion::SensorId;

    #[test]
    fn test_capture_messages() {
        assert_eq!(
            ApiError::from(CaptureError::DeviceClosed).message(),
            "Camera initialization failed."
        );
        assert_eq!(
            ApiError::from(CaptureError::FrameReadFailed("x".into())).message(),
            "Image capture failed."
        );
        assert_eq!(
            ApiError::from(CaptureError::EncodeFailed("x".into())).message(),
            "Image encoding failed."
        );
    }

    #[test]
    fn test_sequence_error_unwraps_capture_source() {
        let e = ApiError::from(SequenceError::Capture {
            position_index: 2,
            source: CaptureError::DeviceClosed,
        });
        assert!(matches!(e, ApiError::Capture(CaptureError::DeviceClosed)));
    }

    #[test]
    fn test_motion_message_names_sensor() {
        let e = ApiError::from(SequenceError::Motion(MotionError::StepLimitExceeded {
            sensor: SensorId::Y_MAX,
            steps: 10,
        }));
        assert!(e.message().contains("Y-max"), "{}", e.message());
    }

    #[test]
    fn test_error_response_is_500() {
        let response = ApiError::Worker("boom".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
