//! Image proxy: `GET /api/images/{filename}`.

use axum::extract::{Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Fetch a result image from the backend and return it with the backend's
/// content type. The upstream status is checked and the body fully read
/// before anything is written back.
pub async fn get_image(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> AppResult<Response> {
    let image = state
        .backend
        .fetch_image(&filename, state.config.max_image_bytes)
        .await
        .map_err(|e| AppError::Image(e.to_string()))?;

    Ok(([(CONTENT_TYPE, image.content_type)], image.bytes).into_response())
}
