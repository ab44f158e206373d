//! Pagination query parameters and response metadata.

use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_with::{DisplayFromStr, serde_as};

use crate::error::AppError;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PER_PAGE: u32 = 5;
pub const MAX_PER_PAGE: u32 = 100;

/// Pagination query parameters.
///
/// Uses `serde_with` to parse page numbers from query strings as integers.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<u32>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub per_page: Option<u32>,
}

/// A validated page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u32,
    pub per_page: u32,
}

impl Page {
    /// Row offset for SQL queries.
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.per_page)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }
}

impl PaginationParams {
    /// Applies defaults and validates the parameters.
    ///
    /// # Defaults
    ///
    /// - `page`: 1
    /// - `per_page`: 5
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `page` is 0 or `per_page` is outside
    /// `1..=100`.
    pub fn validate(&self) -> Result<Page, AppError> {
        let page = self.page.unwrap_or(DEFAULT_PAGE);
        let per_page = self.per_page.unwrap_or(DEFAULT_PER_PAGE);

        if page == 0 {
            return Err(AppError::bad_request(
                "Page must be greater than 0",
                json!({ "page": page }),
            ));
        }

        if !(1..=MAX_PER_PAGE).contains(&per_page) {
            return Err(AppError::bad_request(
                format!("per_page must be between 1 and {MAX_PER_PAGE}"),
                json!({ "per_page": per_page }),
            ));
        }

        Ok(Page { page, per_page })
    }
}

/// Page navigation metadata returned alongside list results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub pages: u32,
    pub per_page: u32,
    pub total_count: i64,
    pub prev_page: Option<u32>,
    pub next_page: Option<u32>,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMeta {
    pub fn new(page: Page, total_count: i64) -> Self {
        let total = u64::try_from(total_count).unwrap_or(0);
        let pages = u32::try_from(total.div_ceil(u64::from(page.per_page))).unwrap_or(u32::MAX);

        let has_prev = page.page > 1;
        let has_next = page.page < pages;

        Self {
            page: page.page,
            pages,
            per_page: page.per_page,
            total_count,
            prev_page: has_prev.then(|| page.page - 1),
            next_page: has_next.then(|| page.page + 1),
            has_next,
            has_prev,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: Option<u32>, per_page: Option<u32>) -> PaginationParams {
        PaginationParams { page, per_page }
    }

    #[test]
    fn test_defaults() {
        let page = params(None, None).validate().unwrap();
        assert_eq!(page, Page { page: 1, per_page: 5 });
        assert_eq!(page.offset(), 0);
        assert_eq!(page.limit(), 5);
    }

    #[test]
    fn test_offset_for_later_page() {
        let page = params(Some(3), Some(20)).validate().unwrap();
        assert_eq!(page.offset(), 40);
        assert_eq!(page.limit(), 20);
    }

    #[test]
    fn test_page_zero_is_error() {
        assert!(params(Some(0), None).validate().is_err());
    }

    #[test]
    fn test_per_page_bounds() {
        assert!(params(None, Some(0)).validate().is_err());
        assert!(params(None, Some(1)).validate().is_ok());
        assert!(params(None, Some(100)).validate().is_ok());
        assert!(params(None, Some(101)).validate().is_err());
    }

    #[test]
    fn test_query_string_parsing() {
        let p: PaginationParams = serde_json::from_str(r#"{"page": "2", "per_page": "10"}"#).unwrap();
        assert_eq!(p.page, Some(2));
        assert_eq!(p.per_page, Some(10));
    }

    #[test]
    fn test_meta_middle_page() {
        let meta = PaginationMeta::new(Page { page: 2, per_page: 5 }, 12);

        assert_eq!(meta.pages, 3);
        assert_eq!(meta.prev_page, Some(1));
        assert_eq!(meta.next_page, Some(3));
        assert!(meta.has_prev);
        assert!(meta.has_next);
    }

    #[test]
    fn test_meta_last_page() {
        let meta = PaginationMeta::new(Page { page: 3, per_page: 5 }, 15);

        assert_eq!(meta.pages, 3);
        assert_eq!(meta.next_page, None);
        assert!(!meta.has_next);
    }

    #[test]
    fn test_meta_empty() {
        let meta = PaginationMeta::new(Page { page: 1, per_page: 5 }, 0);

        assert_eq!(meta.pages, 0);
        assert_eq!(meta.total_count, 0);
        assert!(!meta.has_prev);
        assert!(!meta.has_next);
        assert_eq!(meta.prev_page, None);
    }
}
