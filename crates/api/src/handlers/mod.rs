pub mod detect;
pub mod health;
pub mod history;
pub mod images;

use crate::error::AppError;

/// Fallback for every method a route does not serve.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
