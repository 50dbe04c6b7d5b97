//! List query serialization
//!
//! Produces `filter[key]=value&...&sort=..&page[number]=..&page[size]=..&include=..`
//! with every value percent-encoded.

use parasut_domain::constants::MAX_PAGE_SIZE;

/// Pagination window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: u32,
    pub size: u32,
}

/// Query options accepted by the list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    /// `filter[key]=value` pairs, kept in insertion order.
    pub filter: Vec<(String, String)>,
    /// Sort expression, e.g. `-issue_date`.
    pub sort: Option<String>,
    pub page: Option<Page>,
    /// Comma-separated relationships to side-load.
    pub include: Option<String>,
}

impl ListParams {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filter.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Page size is clamped to what the service accepts (1..=25).
    #[must_use]
    pub fn page(mut self, number: u32, size: u32) -> Self {
        self.page = Some(Page { number: number.max(1), size: size.clamp(1, MAX_PAGE_SIZE) });
        self
    }

    #[must_use]
    pub fn include(mut self, include: impl Into<String>) -> Self {
        self.include = Some(include.into());
        self
    }

    /// Query string without the leading `?`; empty when nothing is set.
    pub fn to_query(&self) -> String {
        let mut parts: Vec<String> = self
            .filter
            .iter()
            .map(|(key, value)| {
                format!("filter[{}]={}", urlencoding::encode(key), urlencoding::encode(value))
            })
            .collect();

        if let Some(sort) = &self.sort {
            parts.push(format!("sort={}", urlencoding::encode(sort)));
        }
        if let Some(page) = self.page {
            parts.push(format!("page[number]={}", page.number));
            parts.push(format!("page[size]={}", page.size));
        }
        if let Some(include) = &self.include {
            parts.push(format!("include={}", urlencoding::encode(include)));
        }

        parts.join("&")
    }

    /// `/{resource}?{query}`
    pub fn path_for(&self, resource: &str) -> String {
        format!("/{resource}?{}", self.to_query())
    }
}

/// Query suffix of the show endpoints: `?include=..`, or a bare `?`.
pub(crate) fn include_suffix(include: Option<&str>) -> String {
    match include {
        Some(include) => format!("?include={}", urlencoding::encode(include)),
        None => "?".to_string(),
    }
}
