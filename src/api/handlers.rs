//! Request handlers for the image endpoints

use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;

use crate::error::AppError;
use crate::request::{ImageRequest, ImageRequestBody, Mode};
use crate::AppState;

/// `POST /api/generate-image` and `POST /api/analyze-image`
pub async fn generate_image(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ImageRequestBody>, JsonRejection>,
) -> Response {
    run(&state, payload, None).await
}

/// `POST /api/inpaint`: image and mask are required
pub async fn inpaint(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ImageRequestBody>, JsonRejection>,
) -> Response {
    run(&state, payload, Some(Mode::Inpaint)).await
}

/// `GET /health`
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn run(
    state: &AppState,
    payload: Result<Json<ImageRequestBody>, JsonRejection>,
    required_mode: Option<Mode>,
) -> Response {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => return state.error_mapper.map(AppError::from(rejection)),
    };

    let mut request = ImageRequest::from(body);
    if required_mode.is_some() {
        request.requested_mode = required_mode;
    }

    match state.gateway.handle(request).await {
        Ok(result) => Json(result).into_response(),
        Err(err) => state.error_mapper.map(err),
    }
}
