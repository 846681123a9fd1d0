use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// ```text
/// GET /history?page=&pageSize=&minPeople=&maxPeople=&dateFrom=&dateTo=&search=
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/history",
        get(handlers::history::list_history)
            // `get` would otherwise answer HEAD with the GET handler.
            .head(handlers::method_not_allowed)
            .fallback(handlers::method_not_allowed),
    )
}
