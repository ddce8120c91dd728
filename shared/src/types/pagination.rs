//! Pagination types for list endpoints

use serde::{Deserialize, Serialize};

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_PER_PAGE: u32 = 20;
const MIN_PER_PAGE: u32 = 1;
const MAX_PER_PAGE: u32 = 100;

/// Pagination parameters for list endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Current page number (1-indexed)
    #[serde(default = "default_page")]
    pub page: u32,

    /// Number of items per page
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl Pagination {
    /// Create a new pagination, clamping values into the accepted range
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(MIN_PER_PAGE, MAX_PER_PAGE),
        }
    }

    /// Offset for database queries, saturating for pages past the end
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)).saturating_mul(u64::from(self.per_page))
    }

    /// Limit for database queries
    pub fn limit(&self) -> u32 {
        self.per_page
    }

    /// Validate and sanitize pagination parameters
    pub fn validate(self) -> Self {
        Self::new(self.page, self.per_page)
    }
}

/// Paginated response wrapper with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    /// The actual data items
    pub data: Vec<T>,

    /// Current page number
    pub page: u32,

    /// Items per page
    pub per_page: u32,

    /// Total number of items
    pub total: u64,

    /// Total number of pages
    pub total_pages: u32,

    /// Whether there's a next page
    pub has_next: bool,

    /// Whether there's a previous page
    pub has_prev: bool,
}

impl<T> PaginatedResponse<T> {
    /// Create a new paginated response
    pub fn new(data: Vec<T>, pagination: Pagination, total: u64) -> Self {
        let total_pages = Self::calculate_total_pages(total, pagination.per_page);

        Self {
            data,
            page: pagination.page,
            per_page: pagination.per_page,
            total,
            total_pages,
            has_next: pagination.page < total_pages,
            has_prev: pagination.page > 1,
        }
    }

    fn calculate_total_pages(total: u64, per_page: u32) -> u32 {
        if total == 0 || per_page == 0 {
            return 0;
        }
        total.div_ceil(per_page as u64) as u32
    }

    /// Transform the data items using a function
    pub fn map<U, F>(self, f: F) -> PaginatedResponse<U>
    where
        F: FnMut(T) -> U,
    {
        PaginatedResponse {
            data: self.data.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total: self.total,
            total_pages: self.total_pages,
            has_next: self.has_next,
            has_prev: self.has_prev,
        }
    }
}

fn default_page() -> u32 {
    DEFAULT_PAGE
}

fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_clamps() {
        let p = Pagination::new(0, 1000);
        assert_eq!(p.page, 1);
        assert_eq!(p.per_page, MAX_PER_PAGE);
        assert_eq!(Pagination::new(3, 20).offset(), 40);
    }

    #[test]
    fn test_offset_of_last_page_does_not_overflow() {
        let p = Pagination::new(u32::MAX, MAX_PER_PAGE);
        assert_eq!(p.offset(), u64::from(u32::MAX - 1) * 100);

        let p: Pagination = serde_json::from_str(r#"{"page": 4294967295, "per_page": 100}"#).unwrap();
        assert_eq!(p.validate().offset(), 429_496_729_400);
    }

    #[test]
    fn test_paginated_response_metadata() {
        let response = PaginatedResponse::new(vec![1, 2, 3], Pagination::new(2, 3), 7);
        assert_eq!(response.total_pages, 3);
        assert!(response.has_next);
        assert!(response.has_prev);

        let last = PaginatedResponse::new(vec![7], Pagination::new(3, 3), 7);
        assert!(!last.has_next);
    }

    #[test]
    fn test_empty_response() {
        let response: PaginatedResponse<u8> = PaginatedResponse::new(vec![], Pagination::default(), 0);
        assert_eq!(response.total_pages, 0);
        assert!(!response.has_next);
        assert!(!response.has_prev);
    }
}
