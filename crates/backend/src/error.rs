/// Errors from the backend REST layer.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status code.
    #[error("Backend responded with {status} {reason}")]
    Upstream {
        /// HTTP status code.
        status: u16,
        /// Canonical reason phrase, empty when unknown.
        reason: String,
    },

    /// The backend answered 2xx but the body could not be decoded.
    #[error("Malformed backend response: {0}")]
    Malformed(String),

    /// The response body is larger than the configured cap.
    #[error("Backend response exceeds {limit} bytes")]
    TooLarge { limit: usize },

    /// The request could not be built from the given input.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<headcount_core::error::CoreError> for BackendError {
    fn from(err: headcount_core::error::CoreError) -> Self {
        match err {
            headcount_core::error::CoreError::Validation(msg) => Self::InvalidRequest(msg),
        }
    }
}
