use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// ```text
/// GET /images/{filename}
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/images/{filename}",
        get(handlers::images::get_image)
            // `get` would otherwise answer HEAD with the GET handler.
            .head(handlers::method_not_allowed)
            .fallback(handlers::method_not_allowed),
    )
}
