//! History query: `GET /api/history`.
//!
//! Accepts the browser's view state as query parameters (`page`,
//! `pageSize`, `minPeople`, `maxPeople`, `dateFrom`, `dateTo`, `search`),
//! translates it into the backend's list and count queries, and returns the
//! page together with its pagination metadata.

use axum::extract::{Query, State};
use axum::Json;
use headcount_core::error::CoreError;
use headcount_core::history::{
    compose_query, DisplayRange, FilterField, FilterState, GatewayQueryState, PageSize, PageState,
    QueryAction,
};
use headcount_core::types::HistoryRecord;
use headcount_core::urls::resolve_public_url;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::query::HistoryParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// One page of history as shown to the browser.
#[derive(Debug, Serialize)]
pub struct HistoryPage {
    /// Rows of the current page left after the filename search.
    pub records: Vec<HistoryRecord>,
    pub page: u32,
    pub page_size: PageSize,
    /// Server-side totals; the filename search does not change them.
    pub total_records: u64,
    pub total_pages: u64,
    pub range: DisplayRange,
    /// `"21 to 23 of 23 results"`.
    pub summary: String,
}

impl HistoryPage {
    fn from_state(state: GatewayQueryState, public_api_url: &str) -> Self {
        let range = state.page.display_range();
        let records = state
            .visible
            .into_iter()
            .map(|record| HistoryRecord {
                result_image_url: record
                    .result_image_url
                    .as_deref()
                    .map(|path| resolve_public_url(public_api_url, path)),
                ..record
            })
            .collect();

        Self {
            records,
            page: state.page.page,
            page_size: state.page.page_size,
            total_records: state.page.total_records,
            total_pages: state.page.total_pages,
            summary: range.to_string(),
            range,
        }
    }
}

/// Build the initial query state from the request parameters.
pub fn state_from_params(params: &HistoryParams) -> Result<GatewayQueryState, CoreError> {
    let page = PageState::from_raw(params.page.as_deref(), params.page_size.as_deref())?;

    let filters = FilterState::default()
        .with_search(params.search.as_deref())
        .with_raw(FilterField::MinPeople, params.min_people.as_deref())?
        .with_raw(FilterField::MaxPeople, params.max_people.as_deref())?
        .with_raw(FilterField::DateFrom, params.date_from.as_deref())?
        .with_raw(FilterField::DateTo, params.date_to.as_deref())?;

    Ok(GatewayQueryState::new(page, filters))
}

/// Run the paired list/count fetch for the requested view.
///
/// When the count shows the requested page no longer exists, the last page
/// is fetched instead (once).
pub async fn list_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> AppResult<Json<DataResponse<HistoryPage>>> {
    let mut query_state = state_from_params(&params)?;
    let mut retried = false;

    loop {
        let requests = compose_query(&query_state);
        tracing::debug!(list = %requests.list, count = %requests.count, "Fetching history");

        let fetched = state
            .backend
            .fetch_history(&requests)
            .await
            .map_err(|e| AppError::HistoryFetch(e.to_string()))?;

        let transition = query_state.apply(QueryAction::Fetched {
            records: fetched.records,
            count: fetched.count,
        });
        query_state = transition.state;

        if !transition.refetch || retried {
            break;
        }
        retried = true;
        tracing::debug!(
            page = query_state.page.page,
            total_pages = query_state.page.total_pages,
            "Requested page out of range, loading last page"
        );
    }

    Ok(Json(DataResponse {
        data: HistoryPage::from_state(query_state, &state.config.public_api_url),
    }))
}
