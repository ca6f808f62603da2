//! HTTP routes.
//!
//! | Method | Path                            | Action                           |
//! |--------|---------------------------------|----------------------------------|
//! | GET    | `/api/move_motors`              | P1 → P2 → P3 → P4 → P1           |
//! | GET    | `/api/movement_sequence_images` | same run, one still per corner   |

use crate::error::{ApiError, StatusMessage};
use crate::state::{SharedStation, with_station};
use axum::extract::State;
use axum::http::Method;
use axum::routing::get;
use axum::{Json, Router};
use base64::{Engine as _, engine::general_purpose};
use gantry_common::config::ApiConfig;
use gantry_motion::CapturedImage;
use serde::Serialize;
use serde_json::{Map, Value};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// `{"status":"success","images":[{"image_number_1":"<base64>"}, ...]}`
#[derive(Debug, Serialize)]
pub struct ImagesResponse {
    pub status: &'static str,
    pub images: Vec<Map<String, Value>>,
}

/// Build the application router.
pub fn router(station: SharedStation, api: &ApiConfig) -> Router {
    let router = Router::new()
        .route("/api/move_motors", get(move_motors))
        .route("/api/movement_sequence_images", get(movement_sequence_images))
        .with_state(station)
        .layer(TraceLayer::new_for_http());

    if api.cors {
        router.layer(cors_layer())
    } else {
        router
    }
}

/// Any origin, credentials allowed (origin and headers are mirrored).
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_credentials(true)
}

async fn move_motors(State(station): State<SharedStation>) -> Result<Json<StatusMessage>, ApiError> {
    info!("Executing motor movement sequence...");
    let report = with_station(station, |s| s.move_motors()).await?;
    info!("Motor movement completed ({} steps).", report.total_steps());
    Ok(Json(StatusMessage {
        status: "success",
        message: "Motors moved to all positions.".to_string(),
    }))
}

async fn movement_sequence_images(
    State(station): State<SharedStation>,
) -> Result<Json<ImagesResponse>, ApiError> {
    info!("Starting movement and image capture sequence...");
    let images = with_station(station, |s| s.capture_images()).await?;
    info!("Image capture sequence completed.");
    Ok(Json(ImagesResponse {
        status: "success",
        images: images.iter().map(image_entry).collect(),
    }))
}

fn image_entry(image: &CapturedImage) -> Map<String, Value> {
    let mut entry = Map::new();
    entry.insert(
        format!("image_number_{}", image.position_index),
        Value::String(general_purpose::STANDARD.encode(&image.bytes)),
    );
    entry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_entry_shape() {
        let entry = image_entry(&CapturedImage {
            position_index: 3,
            bytes: vec![0xFF, 0xD8, 0xFF, 0xD9],
        });
        assert_eq!(entry.len(), 1);
        assert_eq!(entry["image_number_3"], Value::String("/9j/2Q==".to_string()));
    }
}
