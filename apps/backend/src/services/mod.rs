//! Business operations called by route handlers.

pub mod auth;
pub mod customers;
pub mod orders;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PAGE_LIMIT: u64 = 10;
pub const MAX_PAGE_LIMIT: u64 = 100;

/// Normalized paging and search input for list endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    pub page: u64,
    pub limit: u64,
    /// Lowercased, trimmed, never empty
    pub search: Option<String>,
}

impl ListParams {
    /// `page` is at least 1, `limit` is clamped to `1..=MAX_PAGE_LIMIT`,
    /// and a blank search means no filter.
    pub fn new(page: Option<u64>, limit: Option<u64>, search: Option<String>) -> Self {
        Self {
            page: page.unwrap_or(DEFAULT_PAGE).max(1),
            limit: limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT),
            search: search
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty()),
        }
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }
}

impl Default for ListParams {
    fn default() -> Self {
        Self::new(None, None, None)
    }
}
