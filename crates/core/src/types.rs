use serde::{Deserialize, Serialize};

/// History record primary keys as issued by the backend.
pub type RecordId = i64;

/// Filename used for an upload when no usable name came with it.
pub const DEFAULT_UPLOAD_FILENAME: &str = "image.jpg";

/// Content type assumed when neither the client nor the backend declares one.
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Result of a single detection run, as returned by `POST /detect`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub people_count: u32,
    pub original_filename: String,
    /// ISO-8601, passed through untouched.
    pub timestamp: String,
    /// Backend-relative path of the annotated image.
    pub result_image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
}

/// One row of `GET /history`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: RecordId,
    pub timestamp: String,
    pub original_filename: String,
    pub people_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_image_url: Option<String>,
}

/// Body of `GET /history/count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryCount {
    pub count: u64,
}

/// Whether a declared content type names an image.
///
/// Upload widgets use this to reject non-image files before any request is
/// made; the gateway itself forwards whatever it receives.
pub fn is_image_content_type(content_type: &str) -> bool {
    content_type
        .trim()
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
}

/// Reduce a client-supplied filename to a safe, display-only basename.
///
/// Keeps the last path component (either separator), drops control
/// characters and surrounding whitespace. Falls back to
/// [`DEFAULT_UPLOAD_FILENAME`] when nothing usable is left.
pub fn normalize_upload_filename(raw: &str) -> String {
    let basename = raw.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = basename.chars().filter(|c| !c.is_control()).collect();
    let cleaned = cleaned.trim();

    match cleaned {
        "" | "." | ".." => DEFAULT_UPLOAD_FILENAME.to_string(),
        name => name.to_string(),
    }
}
