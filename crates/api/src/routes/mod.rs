pub mod detect;
pub mod health;
pub mod history;
pub mod images;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /detect                  upload proxy (POST)
/// /images/{filename}       result image proxy (GET)
/// /history                 paged, filtered detection history (GET)
/// ```
///
/// Every other method on these paths answers 405 with a JSON body.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(detect::router())
        .merge(images::router())
        .merge(history::router())
}
