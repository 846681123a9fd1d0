//! Backend and public URL derivation.
//!
//! The gateway is configured with a single backend URL pointing at the
//! detect endpoint (e.g. `http://localhost:8386/api/v1/detect`). Every other
//! backend route hangs off the same base, which is obtained by stripping the
//! `/detect` suffix.

use crate::error::CoreError;

/// Endpoint suffix carried by the configured backend URL.
pub const DETECT_SUFFIX: &str = "/detect";

/// Derive the backend API base from the configured detect URL.
///
/// A trailing `/` is ignored. URLs that do not end in `/detect` are taken to
/// already be the base.
///
/// ```
/// use headcount_core::urls::backend_base_url;
///
/// assert_eq!(backend_base_url("http://x/api/v1/detect"), "http://x/api/v1");
/// assert_eq!(backend_base_url("http://x/api/v1/"), "http://x/api/v1");
/// ```
pub fn backend_base_url(detect_url: &str) -> &str {
    let trimmed = detect_url.trim_end_matches('/');
    trimmed.strip_suffix(DETECT_SUFFIX).unwrap_or(trimmed)
}

/// Build the backend URL of a stored image.
///
/// The filename is opaque: it is percent-encoded as one path segment and
/// never interpreted as a path. Empty names and dot segments are rejected.
pub fn image_url(base: &str, filename: &str) -> Result<String, CoreError> {
    if matches!(filename, "" | "." | "..") {
        return Err(CoreError::Validation(format!(
            "invalid image filename: {filename:?}"
        )));
    }
    Ok(format!("{base}/images/{}", urlencoding::encode(filename)))
}

/// Resolve a backend-relative result path against the public API base so a
/// browser can load it directly. Absolute URLs pass through unchanged.
pub fn resolve_public_url(public_base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    let base = public_base.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}
