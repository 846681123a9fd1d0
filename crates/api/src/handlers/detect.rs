//! Upload proxy: `POST /api/detect`.

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use headcount_core::types::is_image_content_type;

use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::upload::UploadEnvelope;

/// Buffer the upload, repackage it as a single `file` part and relay the
/// backend's status and JSON body unchanged.
///
/// Inbound headers other than `Content-Type` are not forwarded.
pub async fn detect(
    State(state): State<AppState>,
    request: Request,
) -> AppResult<Response> {
    let UploadEnvelope {
        bytes,
        filename,
        content_type,
    } = UploadEnvelope::from_request(request, state.config.max_upload_bytes)
        .await
        .map_err(|e| AppError::Upload(e.to_string()))?;

    if !is_image_content_type(&content_type) {
        // Rejection is left to the backend (422).
        tracing::warn!(%filename, %content_type, "Upload does not declare an image type");
    }

    tracing::info!(
        %filename,
        %content_type,
        size = bytes.len(),
        url = %state.backend.detect_url(),
        "Forwarding upload to backend"
    );

    let relayed = state
        .backend
        .detect(bytes, filename, &content_type)
        .await
        .map_err(|e| AppError::Upload(e.to_string()))?;

    tracing::debug!(status = relayed.status, body = %relayed.body, "Response from backend");

    let status = StatusCode::from_u16(relayed.status).map_err(|e| AppError::Upload(e.to_string()))?;
    Ok((status, Json(relayed.body)).into_response())
}
