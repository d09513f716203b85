//! The Options Builder: raw list-query parameters parsed into a canonical
//! [`ListOptions`] value.
//!
//! Malformed optional fields (unparseable `year`, unknown `sortBy` token)
//! are treated as absent rather than rejected. Only `page` and `pageSize`
//! have a failure path: a non-positive value is an invalid request.

use serde::Deserialize;
use uuid::Uuid;

use crate::error::CoreError;

/// First page served when the client does not ask for one.
pub const DEFAULT_PAGE: u32 = 1;
/// Page size used when the client does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;
/// Upper bound on the page size a client may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Field a movie listing can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Title,
    YearOfRelease,
}

impl SortField {
    /// Parses a sign-stripped sort token. Unknown tokens yield `None`,
    /// which the builder treats as "no sort".
    fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "title" => Some(Self::Title),
            "year" | "yearofrelease" => Some(Self::YearOfRelease),
            _ => None,
        }
    }
}

/// Sort direction, ascending unless a `-` prefix says otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Raw query parameters of a list request, before validation.
///
/// Every field is an optional string so that a malformed value never fails
/// extraction; leniency decisions belong to [`ListOptions::build`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawListQuery {
    pub title: Option<String>,
    pub year: Option<String>,
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    pub page: Option<String>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<String>,
}

/// Canonical, validated representation of a list query: filter + sort +
/// pagination + requesting identity. Transient, built per request.
#[derive(Debug, Clone, PartialEq)]
pub struct ListOptions {
    pub title: Option<String>,
    pub year_of_release: Option<i32>,
    pub sort_field: Option<SortField>,
    pub sort_order: SortOrder,
    /// Requesting identity; `None` for anonymous requests. Never part of
    /// the cache key.
    pub user_id: Option<Uuid>,
    pub page: u32,
    pub page_size: u32,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            title: None,
            year_of_release: None,
            sort_field: None,
            sort_order: SortOrder::Ascending,
            user_id: None,
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ListOptions {
    /// Builds canonical options from raw query parameters.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidRequest`] when `page` or `pageSize` is
    /// zero or negative. All other malformed inputs are treated as absent.
    pub fn build(raw: &RawListQuery) -> Result<Self, CoreError> {
        let title = raw
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_owned);

        let year_of_release = raw.year.as_deref().and_then(|y| y.trim().parse::<i32>().ok());

        let (sort_field, sort_order) = parse_sort(raw.sort_by.as_deref());

        let page = parse_bounded(raw.page.as_deref(), "page", DEFAULT_PAGE, u32::MAX)?;
        let page_size = parse_bounded(
            raw.page_size.as_deref(),
            "pageSize",
            DEFAULT_PAGE_SIZE,
            MAX_PAGE_SIZE,
        )?;

        Ok(Self {
            title,
            year_of_release,
            sort_field,
            sort_order,
            user_id: None,
            page,
            page_size,
        })
    }

    /// Attaches the requesting identity.
    #[must_use]
    pub fn with_user_id(mut self, user_id: Option<Uuid>) -> Self {
        self.user_id = user_id;
        self
    }

    /// Zero-based row offset implied by page and page size.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }
}

/// Parses a `sortBy` token into field and order.
///
/// A `-` prefix means descending, `+` or no prefix means ascending. The
/// sign-stripped token names the field; unrecognized names are silently
/// dropped (no sort), which preserves the lenient behavior existing
/// clients depend on.
fn parse_sort(sort_by: Option<&str>) -> (Option<SortField>, SortOrder) {
    let Some(token) = sort_by.map(str::trim).filter(|t| !t.is_empty()) else {
        return (None, SortOrder::Ascending);
    };

    let order = if token.starts_with('-') {
        SortOrder::Descending
    } else {
        SortOrder::Ascending
    };

    let stripped = token.trim_matches(|c| c == '+' || c == '-');
    let field = SortField::parse(stripped);

    match field {
        Some(f) => (Some(f), order),
        None => (None, SortOrder::Ascending),
    }
}

/// Parses a positive integer field, applying a default when absent or
/// unparseable and capping at `max`.
fn parse_bounded(
    value: Option<&str>,
    name: &str,
    default: u32,
    max: u32,
) -> Result<u32, CoreError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(default),
        Some(v) => match v.parse::<i64>() {
            Ok(n) if n <= 0 => Err(CoreError::invalid_request(format!(
                "{name} must be a positive integer"
            ))),
            Ok(n) => Ok(u32::try_from(n).unwrap_or(max).min(max)),
            // Unparseable values are treated as absent, same as the other
            // optional fields.
            Err(_) => Ok(default),
        },
    }
}
