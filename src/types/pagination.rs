//! Pagination primitives shared by list endpoints.

use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Query parameters for paginated endpoints
#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct PaginationParams {
    /// Page number, 1-based
    pub page: Option<u64>,
    /// Items per page, capped at 50
    pub page_size: Option<u64>,
}

impl PaginationParams {
    /// Effective page number; zero and absent both mean page 1.
    pub fn page(&self) -> u64 {
        match self.page {
            Some(0) | None => DEFAULT_PAGE_NUMBER,
            Some(page) => page,
        }
    }

    /// Effective page size, clamped to [1, MAX_PAGE_SIZE].
    pub fn page_size(&self) -> u64 {
        match self.page_size {
            Some(0) | None => DEFAULT_PAGE_SIZE,
            Some(size) => size.min(MAX_PAGE_SIZE),
        }
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: None,
            page_size: None,
        }
    }
}

/// Pagination metadata returned alongside page items
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: u64,
    pub page_size: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl PaginationMeta {
    pub fn new(page: u64, page_size: u64, total: u64) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            total.div_ceil(page_size)
        };
        Self {
            page,
            page_size,
            total,
            total_pages,
        }
    }
}

/// A page of items with its metadata
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub meta: PaginationMeta,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, page: u64, page_size: u64, total: u64) -> Self {
        Self {
            items,
            meta: PaginationMeta::new(page, page_size, total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = PaginationParams::default();
        assert_eq!(params.page(), 1);
        assert_eq!(params.page_size(), 10);
    }

    #[test]
    fn test_page_size_capped() {
        let params = PaginationParams {
            page: Some(2),
            page_size: Some(500),
        };
        assert_eq!(params.page(), 2);
        assert_eq!(params.page_size(), 50);
    }

    #[test]
    fn test_zero_values_fall_back_to_defaults() {
        let params = PaginationParams {
            page: Some(0),
            page_size: Some(0),
        };
        assert_eq!(params.page(), 1);
        assert_eq!(params.page_size(), 10);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let meta = PaginationMeta::new(1, 10, 25);
        assert_eq!(meta.total_pages, 3);

        let empty = PaginationMeta::new(1, 10, 0);
        assert_eq!(empty.total_pages, 0);
    }
}
