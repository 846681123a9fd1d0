use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use headcount_core::error::CoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Every variant renders as a JSON object with a stable `error` string and,
/// except for [`AppError::MethodNotAllowed`], a `details` field carrying the
/// underlying message.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The route exists but not for this HTTP method.
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Buffering, repackaging or forwarding an upload failed.
    #[error("Failed to process the request: {0}")]
    Upload(String),

    /// Fetching a result image from the backend failed.
    #[error("Failed to retrieve image: {0}")]
    Image(String),

    /// The paired history list/count fetch failed.
    #[error("Failed to fetch data from server: {0}")]
    HistoryFetch(String),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => AppError::BadRequest(msg),
        }
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, Option<&str>) {
        match self {
            AppError::MethodNotAllowed => {
                (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed", None)
            }
            AppError::Upload(details) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to process the request",
                Some(details.as_str()),
            ),
            AppError::Image(details) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to retrieve image",
                Some(details.as_str()),
            ),
            AppError::HistoryFetch(details) => (
                StatusCode::BAD_GATEWAY,
                "Failed to fetch data from server.",
                Some(details.as_str()),
            ),
            AppError::BadRequest(details) => {
                (StatusCode::BAD_REQUEST, "Bad request", Some(details.as_str()))
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = self.parts();

        if status.is_server_error() {
            tracing::error!(error = %self, "Gateway request failed");
        } else {
            tracing::warn!(error = %self, "Gateway request rejected");
        }

        let body = match details {
            Some(details) => json!({ "error": error, "details": details }),
            None => json!({ "error": error }),
        };

        (status, axum::Json(body)).into_response()
    }
}
