//! Pagination request/response shapes.

use serde::{Deserialize, Serialize};

/// Page number used when the caller sends zero.
pub const DEFAULT_PAGE: u32 = 1;
/// Page size used when the caller sends zero.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// One-based page request. Zero values fall back to the defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self { page, page_size }
    }

    /// Returns `(page, page_size)` with zero values replaced by defaults.
    pub fn normalized(self) -> (u32, u32) {
        let page = if self.page == 0 { DEFAULT_PAGE } else { self.page };
        let page_size = if self.page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            self.page_size
        };
        (page, page_size)
    }
}

/// Zero-based slice request handed to storage backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListQuery {
    pub offset: u64,
    pub limit: u32,
}

impl ListQuery {
    /// Converts a normalized page request into an offset/limit pair.
    ///
    /// Offset arithmetic saturates instead of overflowing.
    pub fn from_page(page: u32, page_size: u32) -> Self {
        let offset = u64::from(page.saturating_sub(1)) * u64::from(page_size);
        Self {
            offset,
            limit: page_size,
        }
    }
}

/// One page of entities plus totals for navigation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
    pub total_pages: u64,
}

#[cfg(test)]
mod tests {
    use super::{ListQuery, PageRequest};

    #[test]
    fn zero_values_fall_back_to_defaults() {
        assert_eq!(PageRequest::default().normalized(), (1, 10));
        assert_eq!(PageRequest::new(3, 0).normalized(), (3, 10));
        assert_eq!(PageRequest::new(0, 25).normalized(), (1, 25));
    }

    #[test]
    fn offset_is_derived_from_one_based_page() {
        assert_eq!(ListQuery::from_page(1, 10).offset, 0);
        assert_eq!(ListQuery::from_page(4, 10).offset, 30);
        let far = ListQuery::from_page(u32::MAX, u32::MAX);
        assert_eq!(far.offset, u64::from(u32::MAX - 1) * u64::from(u32::MAX));
    }
}
