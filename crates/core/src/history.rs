//! History query composition, pagination math, and page-local search.
//!
//! The browser-facing history view is modelled as an immutable
//! [`GatewayQueryState`]. [`compose_query`] turns a state into the two
//! backend query strings (list and count), and [`GatewayQueryState::apply`]
//! folds user actions and fetch results into a new state, reporting whether
//! a new backend fetch is required.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::HistoryRecord;

// ---------------------------------------------------------------------------
// Page size
// ---------------------------------------------------------------------------

/// Page sizes offered by the history view.
pub const ALLOWED_PAGE_SIZES: [u32; 4] = [5, 10, 25, 50];

/// Page size used when the client does not pick one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// A page size restricted to [`ALLOWED_PAGE_SIZES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "u32")]
pub struct PageSize(u32);

impl PageSize {
    pub fn new(size: u32) -> Result<Self, CoreError> {
        if ALLOWED_PAGE_SIZES.contains(&size) {
            Ok(Self(size))
        } else {
            Err(CoreError::Validation(format!(
                "pageSize must be one of {ALLOWED_PAGE_SIZES:?}, got {size}"
            )))
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(DEFAULT_PAGE_SIZE)
    }
}

impl TryFrom<u32> for PageSize {
    type Error = CoreError;

    fn try_from(size: u32) -> Result<Self, Self::Error> {
        Self::new(size)
    }
}

impl From<PageSize> for u32 {
    fn from(size: PageSize) -> Self {
        size.0
    }
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// A server-side history filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    MinPeople,
    MaxPeople,
    DateFrom,
    DateTo,
}

/// Client key to backend query key, in the order keys are emitted.
pub const FILTER_KEYS: [(FilterField, &str, &str); 4] = [
    FilterField::MinPeople.entry(),
    FilterField::MaxPeople.entry(),
    FilterField::DateFrom.entry(),
    FilterField::DateTo.entry(),
];

impl FilterField {
    const fn keys(self) -> (&'static str, &'static str) {
        match self {
            FilterField::MinPeople => ("minPeople", "min_people"),
            FilterField::MaxPeople => ("maxPeople", "max_people"),
            FilterField::DateFrom => ("dateFrom", "date_from"),
            FilterField::DateTo => ("dateTo", "date_to"),
        }
    }

    const fn entry(self) -> (FilterField, &'static str, &'static str) {
        let (client, backend) = self.keys();
        (self, client, backend)
    }

    /// Key used by the browser-side filter state (`minPeople`).
    pub fn client_key(self) -> &'static str {
        self.keys().0
    }

    /// Key expected by the backend (`min_people`).
    pub fn backend_key(self) -> &'static str {
        self.keys().1
    }

    /// Look up a field by its browser-side key.
    pub fn from_client_key(key: &str) -> Option<Self> {
        FILTER_KEYS
            .iter()
            .find(|(_, client, _)| *client == key)
            .map(|(field, _, _)| *field)
    }
}

/// Constraints narrowing a history query.
///
/// Dates are kept as the strings the client sent; the backend compares them
/// against its ISO-8601 timestamps. `search` never leaves the gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub min_people: Option<u32>,
    pub max_people: Option<u32>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub search: Option<String>,
}

impl FilterState {
    /// Set a field from its raw query-string value.
    ///
    /// `None`, empty and whitespace-only values clear the field. People
    /// counts must parse as non-negative integers.
    pub fn with_raw(mut self, field: FilterField, raw: Option<&str>) -> Result<Self, CoreError> {
        let value = raw.map(str::trim).filter(|v| !v.is_empty());

        match field {
            FilterField::MinPeople => self.min_people = parse_count(field.client_key(), value)?,
            FilterField::MaxPeople => self.max_people = parse_count(field.client_key(), value)?,
            FilterField::DateFrom => self.date_from = value.map(str::to_string),
            FilterField::DateTo => self.date_to = value.map(str::to_string),
        }
        Ok(self)
    }

    pub fn with_search(mut self, search: Option<&str>) -> Self {
        self.search = search.map(str::to_string);
        self
    }

    fn value(&self, field: FilterField) -> Option<String> {
        let value = match field {
            FilterField::MinPeople => self.min_people.map(|n| n.to_string()),
            FilterField::MaxPeople => self.max_people.map(|n| n.to_string()),
            FilterField::DateFrom => self.date_from.clone(),
            FilterField::DateTo => self.date_to.clone(),
        };
        value.filter(|v| !v.trim().is_empty())
    }

    /// Backend query pairs for every present, non-empty filter.
    pub fn backend_params(&self) -> Vec<(&'static str, String)> {
        FILTER_KEYS
            .iter()
            .filter_map(|(field, _, backend)| self.value(*field).map(|v| (*backend, v)))
            .collect()
    }

    /// Whether the two states would send the same filters to the backend.
    pub fn same_backend_filters(&self, other: &Self) -> bool {
        self.backend_params() == other.backend_params()
    }
}

/// Parse an optional non-negative integer named `key` in error messages.
fn parse_count(key: &str, value: Option<&str>) -> Result<Option<u32>, CoreError> {
    value
        .map(|v| {
            v.parse::<u32>().map_err(|_| {
                CoreError::Validation(format!("{key} must be a non-negative integer, got {v:?}"))
            })
        })
        .transpose()
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// Number of pages needed for `total_records` at `page_size`.
pub fn total_pages(total_records: u64, page_size: PageSize) -> u64 {
    total_records.div_ceil(u64::from(page_size.get()))
}

/// Clamp a page index into `[0, total_pages - 1]`, or `0` when empty.
pub fn clamp_page(page: u32, total_pages: u64) -> u32 {
    let last = total_pages.saturating_sub(1);
    u32::try_from(u64::from(page).min(last)).unwrap_or(u32::MAX)
}

/// Pagination cursor plus the totals derived from the last count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageState {
    pub page: u32,
    pub page_size: PageSize,
    pub total_records: u64,
    pub total_pages: u64,
    /// Whether a count has been recorded. Until then pages are not clamped.
    #[serde(skip)]
    counted: bool,
}

impl PageState {
    /// A cursor whose totals are not known yet. The page is not clamped.
    pub fn at(page: u32, page_size: PageSize) -> Self {
        Self {
            page,
            page_size,
            total_records: 0,
            total_pages: 0,
            counted: false,
        }
    }

    /// Build a cursor from raw `page` / `pageSize` query values. Missing or
    /// blank values take the defaults (first page, [`DEFAULT_PAGE_SIZE`]).
    pub fn from_raw(page: Option<&str>, page_size: Option<&str>) -> Result<Self, CoreError> {
        fn blank_to_none(raw: Option<&str>) -> Option<&str> {
            raw.map(str::trim).filter(|v| !v.is_empty())
        }

        let page = parse_count("page", blank_to_none(page))?.unwrap_or(0);
        let page_size = parse_count("pageSize", blank_to_none(page_size))?
            .map(PageSize::new)
            .transpose()?
            .unwrap_or_default();
        Ok(Self::at(page, page_size))
    }

    /// Records to skip to reach the current page.
    pub fn skip(&self) -> u64 {
        u64::from(self.page) * u64::from(self.page_size.get())
    }

    /// Record new totals; `total_pages` is recomputed and the page clamped.
    pub fn with_total_records(self, total_records: u64) -> Self {
        let total_pages = total_pages(total_records, self.page_size);
        Self {
            page: clamp_page(self.page, total_pages),
            total_records,
            total_pages,
            counted: true,
            ..self
        }
    }

    /// Change the page size. Returns to the first page.
    pub fn with_page_size(self, page_size: PageSize) -> Self {
        Self {
            page: 0,
            page_size,
            total_pages: total_pages(self.total_records, page_size),
            ..self
        }
    }

    /// Move to `page`, clamped against the last known totals. Before the
    /// first count the page is taken as is.
    pub fn with_page(self, page: u32) -> Self {
        let page = if self.counted {
            clamp_page(page, self.total_pages)
        } else {
            page
        };
        Self { page, ..self }
    }

    pub fn display_range(&self) -> DisplayRange {
        display_range(self.page, self.page_size, self.total_records)
    }
}

/// The "Showing X to Y of Z results" triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisplayRange {
    pub from: u64,
    pub to: u64,
    pub total: u64,
}

impl std::fmt::Display for DisplayRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {} of {} results", self.from, self.to, self.total)
    }
}

/// Compute the 1-based item range shown for `page`.
pub fn display_range(page: u32, page_size: PageSize, total_records: u64) -> DisplayRange {
    if total_records == 0 {
        return DisplayRange {
            from: 0,
            to: 0,
            total: 0,
        };
    }
    let size = u64::from(page_size.get());
    let page = u64::from(page);
    DisplayRange {
        from: page * size + 1,
        to: ((page + 1) * size).min(total_records),
        total: total_records,
    }
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Case-insensitive filename search over an already-fetched page.
///
/// An empty query returns the records unchanged; any other query, spaces
/// included, is matched as typed. Totals are not affected:
/// only the rows of the current page are narrowed.
pub fn filter_by_search(records: &[HistoryRecord], query: &str) -> Vec<HistoryRecord> {
    if query.is_empty() {
        return records.to_vec();
    }
    let needle = query.to_lowercase();
    records
        .iter()
        .filter(|r| r.original_filename.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// Query composition
// ---------------------------------------------------------------------------

/// Query strings for the paired history fetch (without the leading `?`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequests {
    /// For `GET /history`: pagination followed by filters.
    pub list: String,
    /// For `GET /history/count`: filters only.
    pub count: String,
}

fn encode_pairs(pairs: &[(&str, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Build the list and count queries for the current state.
pub fn compose_query(state: &GatewayQueryState) -> HistoryRequests {
    let filters = state.filters.backend_params();

    let mut list = vec![
        ("skip", state.page.skip().to_string()),
        ("limit", state.page.page_size.get().to_string()),
    ];
    list.extend(filters.iter().cloned());

    HistoryRequests {
        list: encode_pairs(&list),
        count: encode_pairs(&filters),
    }
}

// ---------------------------------------------------------------------------
// State + reducer
// ---------------------------------------------------------------------------

/// Everything the history view knows: cursor, filters, the last fetched page
/// and the rows left visible after search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayQueryState {
    pub page: PageState,
    pub filters: FilterState,
    pub records: Vec<HistoryRecord>,
    pub visible: Vec<HistoryRecord>,
}

/// Inputs to [`GatewayQueryState::apply`].
#[derive(Debug, Clone)]
pub enum QueryAction {
    SetPage(u32),
    SetPageSize(PageSize),
    SetFilters(FilterState),
    SetSearch(String),
    Fetched {
        records: Vec<HistoryRecord>,
        count: u64,
    },
}

/// A new state and whether the backend must be queried again.
#[derive(Debug, Clone)]
pub struct Transition {
    pub state: GatewayQueryState,
    pub refetch: bool,
}

impl GatewayQueryState {
    pub fn new(page: PageState, filters: FilterState) -> Self {
        Self {
            page,
            filters,
            records: Vec::new(),
            visible: Vec::new(),
        }
    }

    fn search(&self) -> &str {
        self.filters.search.as_deref().unwrap_or("")
    }

    pub fn apply(self, action: QueryAction) -> Transition {
        match action {
            QueryAction::SetPage(page) => {
                let page = self.page.with_page(page);
                let refetch = page.page != self.page.page;
                Transition {
                    state: Self { page, ..self },
                    refetch,
                }
            }
            QueryAction::SetPageSize(size) => {
                let refetch = size != self.page.page_size || self.page.page != 0;
                Transition {
                    state: Self {
                        page: self.page.with_page_size(size),
                        ..self
                    },
                    refetch,
                }
            }
            QueryAction::SetFilters(filters) => {
                let refetch = !self.filters.same_backend_filters(&filters);
                let visible = filter_by_search(
                    &self.records,
                    filters.search.as_deref().unwrap_or(""),
                );
                Transition {
                    state: Self {
                        filters,
                        visible,
                        ..self
                    },
                    refetch,
                }
            }
            QueryAction::SetSearch(search) => {
                let visible = filter_by_search(&self.records, &search);
                let filters = FilterState {
                    search: Some(search),
                    ..self.filters
                };
                Transition {
                    state: Self {
                        filters,
                        visible,
                        ..self
                    },
                    refetch: false,
                }
            }
            QueryAction::Fetched { records, count } => {
                let page = self.page.with_total_records(count);
                // The fetched page no longer exists; the last one must be loaded.
                let refetch = page.page != self.page.page;
                let visible = filter_by_search(&records, self.search());
                Transition {
                    state: Self {
                        page,
                        records,
                        visible,
                        ..self
                    },
                    refetch,
                }
            }
        }
    }
}
