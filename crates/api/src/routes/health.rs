use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Mount health check routes (intended for root-level, NOT under `/api`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health_check))
}
