//! Query parameter types for API handlers.

use serde::Deserialize;

/// Browser-side history view state (`?page=&pageSize=&minPeople=&...`).
///
/// Values stay raw strings so that an empty parameter (`minPeople=`) reads
/// as "not set"; parsing and validation happen in
/// [`headcount_core::history`].
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryParams {
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub min_people: Option<String>,
    pub max_people: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub search: Option<String>,
}
