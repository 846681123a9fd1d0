//! Shared response envelope types for gateway-owned endpoints.
//!
//! Endpoints that produce their own payload use a `{ "data": ... }` envelope.
//! Proxied backend answers (detect, images) are relayed untouched and never
//! wrapped.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// # Example
///
/// ```ignore
/// Ok(Json(DataResponse { data: page }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
