//! Pagination models.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::constants::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Paginated list response
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedResponse<T: Serialize> {
    /// Whether the request was successful
    pub success: bool,
    /// List of items
    pub data: Vec<T>,
    /// Total number of items
    pub total: u64,
    /// Current page number
    pub page: u64,
    /// Items per page
    pub per_page: u64,
    /// Total number of pages
    pub total_pages: u64,
}

impl<T: Serialize> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, total: u64, page: Page) -> Self {
        Self {
            success: true,
            data,
            total,
            page: page.page,
            per_page: page.per_page,
            total_pages: total.div_ceil(page.per_page),
        }
    }
}

/// Query parameters shared by list endpoints
#[derive(Debug, Deserialize, Default)]
pub struct ListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    /// Case-insensitive search term
    pub search: Option<String>,
}

impl ListQuery {
    pub fn page(&self) -> Page {
        Page::new(self.page, self.per_page)
    }

    pub fn search(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Normalised page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u64,
    pub per_page: u64,
}

impl Page {
    pub fn new(page: Option<u64>, per_page: Option<u64>) -> Self {
        Self {
            page: page.unwrap_or(DEFAULT_PAGE_NUMBER).max(1),
            per_page: per_page.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn skip(&self) -> u64 {
        (self.page - 1) * self.per_page
    }

    pub fn limit(&self) -> i64 {
        self.per_page as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_defaults_and_bounds() {
        assert_eq!(Page::new(None, None), Page { page: 1, per_page: 10 });
        assert_eq!(Page::new(Some(0), Some(0)), Page { page: 1, per_page: 1 });
        assert_eq!(Page::new(Some(3), Some(500)).per_page, 100);
        assert_eq!(Page::new(Some(3), Some(20)).skip(), 40);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let response = PaginatedResponse::new(vec![1, 2, 3], 21, Page::new(Some(1), Some(10)));
        assert_eq!(response.total_pages, 3);
        let empty: PaginatedResponse<u8> = PaginatedResponse::new(vec![], 0, Page::new(None, None));
        assert_eq!(empty.total_pages, 0);
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let query = ListQuery {
            search: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(query.search(), None);
        let query = ListQuery {
            search: Some(" acme ".into()),
            ..Default::default()
        };
        assert_eq!(query.search(), Some("acme"));
    }
}
