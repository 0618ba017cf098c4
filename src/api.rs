//! HTTP surface of the relay.
//!
//! Every failure is logged and collapsed into a 500 carrying the
//! endpoint's plain-text message; clients never see which vendor failed.

use crate::ai::AnalysisMode;
use crate::models::{
    GenerateImageRequest, GenerateImageResponse, GenerateReplyRequest, GenerateReplyResponse,
    ImageAnalysisRequest, ImageAnalysisResponse, PlantHealthRequest, PlantInfo,
    PlantProfileResponse,
};
use crate::relay::Relay;
use crate::{Error, Result};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

const GENERATE_IMAGE_FAILED: &str = "An error occurred";
const GENERATE_REPLY_FAILED: &str = "An error occurred while generating reply";
const PLANT_PROFILE_FAILED: &str = "An error occurred while generating plant MBTI";
const IMAGE_ANALYSIS_FAILED: &str = "An error occurred during image analysis.";

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<Relay>,
}

/// A failed relay operation, rendered as a generic 500.
#[derive(Debug)]
pub struct ApiError {
    message: &'static str,
    source: Error,
}

impl ApiError {
    fn new(message: &'static str, source: Error) -> Self {
        Self { message, source }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!("{}: {}", self.message, self.source);
        (StatusCode::INTERNAL_SERVER_ERROR, self.message).into_response()
    }
}

/// Unwrap a JSON body, turning a rejected body into the endpoint's 500.
fn json_body<T>(
    payload: std::result::Result<Json<T>, JsonRejection>,
    message: &'static str,
) -> std::result::Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::new(message, Error::InvalidRequest(rejection.body_text())))
}

/// Build the router with request tracing.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/generate-image", post(generate_image))
        .route("/generate-reply", post(generate_reply))
        .route("/generate-plant-mbti", post(generate_plant_mbti))
        .route("/generate-image-analysis", post(generate_image_analysis))
        .route("/analyze-plant-health", post(analyze_plant_health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS policy: any origin unless an allow-list is configured.
pub fn cors_layer(allowed_origins: &[String]) -> Result<CorsLayer> {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if allowed_origins.is_empty() {
        return Ok(layer.allow_origin(Any));
    }

    let origins = allowed_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin)
                .map_err(|_| Error::Config(format!("Invalid CORS origin '{}'", origin)))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(layer.allow_origin(AllowOrigin::list(origins)))
}

async fn generate_image(
    State(state): State<AppState>,
    payload: std::result::Result<Json<GenerateImageRequest>, JsonRejection>,
) -> std::result::Result<Json<GenerateImageResponse>, ApiError> {
    let request = json_body(payload, GENERATE_IMAGE_FAILED)?;
    info!("Image requested for record {}", request.phone_number);

    // Detached so a client disconnect cannot interrupt upload or record update.
    let relay = state.relay.clone();
    let image_url = tokio::spawn(async move { relay.generate_image(&request).await })
        .await
        .map_err(|e| Error::Invariant(format!("Image task join error: {}", e)))
        .and_then(|result| result)
        .map_err(|e| ApiError::new(GENERATE_IMAGE_FAILED, e))?;

    Ok(Json(GenerateImageResponse { image_url }))
}

async fn generate_reply(
    State(state): State<AppState>,
    payload: std::result::Result<Json<GenerateReplyRequest>, JsonRejection>,
) -> std::result::Result<Json<GenerateReplyResponse>, ApiError> {
    let request = json_body(payload, GENERATE_REPLY_FAILED)?;
    info!(
        "Reply requested for diary entry ({} chars)",
        request.diary_entry.chars().count()
    );

    let reply = state
        .relay
        .generate_reply(&request.diary_entry)
        .await
        .map_err(|e| ApiError::new(GENERATE_REPLY_FAILED, e))?;

    Ok(Json(GenerateReplyResponse { reply }))
}

async fn generate_plant_mbti(
    State(state): State<AppState>,
    payload: std::result::Result<Json<PlantInfo>, JsonRejection>,
) -> std::result::Result<Json<PlantProfileResponse>, ApiError> {
    let plant = json_body(payload, PLANT_PROFILE_FAILED)?;
    info!("Plant profile requested: {:?}", plant);

    let plant_mbti = state
        .relay
        .generate_plant_profile(&plant)
        .await
        .map_err(|e| ApiError::new(PLANT_PROFILE_FAILED, e))?;

    Ok(Json(PlantProfileResponse { plant_mbti }))
}

async fn generate_image_analysis(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ImageAnalysisRequest>, JsonRejection>,
) -> std::result::Result<Json<ImageAnalysisResponse>, ApiError> {
    let request = json_body(payload, IMAGE_ANALYSIS_FAILED)?;
    let analysis = state
        .relay
        .analyze_image(&request.image_url, AnalysisMode::Guided)
        .await
        .map_err(|e| ApiError::new(IMAGE_ANALYSIS_FAILED, e))?;

    Ok(Json(ImageAnalysisResponse { analysis }))
}

async fn analyze_plant_health(
    State(state): State<AppState>,
    payload: std::result::Result<Json<PlantHealthRequest>, JsonRejection>,
) -> std::result::Result<String, ApiError> {
    let request = json_body(payload, IMAGE_ANALYSIS_FAILED)?;
    state
        .relay
        .analyze_image(&request.image, AnalysisMode::Instructed)
        .await
        .map_err(|e| ApiError::new(IMAGE_ANALYSIS_FAILED, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_layer_accepts_valid_origins() {
        assert!(cors_layer(&[]).is_ok());
        assert!(cors_layer(&["https://finalproject.example".to_string()]).is_ok());
    }

    #[test]
    fn test_cors_layer_rejects_invalid_origin() {
        let err = cors_layer(&["bad\norigin".to_string()]).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_api_error_is_plain_500() {
        let response =
            ApiError::new(GENERATE_REPLY_FAILED, Error::Upstream("boom".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/plain"));
    }
}
