//! # Gantry HTTP Service
//!
//! Exposes the four-position gantry run over HTTP and wires the station
//! together at startup.
//!
//! # Architecture
//!
//! ```text
//! HTTP ──► axum router ──► spawn_blocking ──► Mutex<Station>
//!                                               ├─ PositionSequencer ──► GPIO lines
//!                                               └─ CaptureDevice (camera)
//! ```

pub mod camera;
pub mod error;
pub mod routes;
pub mod server;
pub mod state;

pub use error::{ApiError, CameraError};
pub use routes::router;
pub use state::{SharedStation, Station};
