use std::sync::Arc;

use headcount_backend::BackendClient;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (body caps, public URL base).
    pub config: Arc<ServerConfig>,
    /// Client for the detection backend; shares one connection pool.
    pub backend: BackendClient,
}
