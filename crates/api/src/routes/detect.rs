use axum::routing::post;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// ```text
/// POST /detect
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/detect",
        post(handlers::detect::detect).fallback(handlers::method_not_allowed),
    )
}
