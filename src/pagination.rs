//! Pagination utilities for Jira search responses.
//!
//! Jira pages by offset (`startAt`) and window size (`maxResults`). The
//! page-oriented view below is derived on the client; the server never sends it.

use serde::{Deserialize, Serialize};

use crate::error::{JiraError, Result};

/// Default window size for search requests.
pub const DEFAULT_MAX_RESULTS: u32 = 50;

/// Largest page count whose index list is materialized.
pub const MAX_PAGE_COUNT: u32 = 1_000_000;

/// Page metadata derived from a search window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Total number of matching items.
    pub total: u32,
    /// Zero-based offset of the first item in the window.
    pub start_at: u32,
    /// Window size.
    pub max_results: u32,
    /// Current page index (zero-based).
    pub page: u32,
    /// Number of pages needed to cover `total`.
    pub page_count: u32,
    /// Every page index, `0..page_count`.
    pub pages: Vec<u32>,
}

impl Pagination {
    /// Compute page metadata from a search window.
    ///
    /// `page_count` is `ceil(total / max_results)` and `page` is
    /// `ceil(start_at / max_results)`.
    ///
    /// # Errors
    ///
    /// Returns [`JiraError::InvalidPagination`] if `max_results` is zero, and
    /// [`JiraError::PageLimitExceeded`] if `page_count` would exceed
    /// [`MAX_PAGE_COUNT`].
    pub fn compute(total: u32, start_at: u32, max_results: u32) -> Result<Self> {
        if max_results == 0 {
            return Err(JiraError::InvalidPagination { max_results });
        }

        let page_count = total.div_ceil(max_results);
        if page_count > MAX_PAGE_COUNT {
            return Err(JiraError::PageLimitExceeded {
                page_count,
                limit: MAX_PAGE_COUNT,
            });
        }
        let page = start_at.div_ceil(max_results);

        Ok(Self {
            total,
            start_at,
            max_results,
            page,
            page_count,
            pages: (0..page_count).collect(),
        })
    }

    /// Whether items remain beyond this window.
    #[must_use]
    pub fn has_next(&self) -> bool {
        u64::from(self.start_at) + u64::from(self.max_results) < u64::from(self.total)
    }

    /// Offset of the next window, if there is one.
    #[must_use]
    pub fn next_start_at(&self) -> Option<u32> {
        if self.has_next() {
            Some(self.start_at + self.max_results)
        } else {
            None
        }
    }
}

/// Query parameters for paginated search requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    /// Zero-based offset of the first result.
    pub start_at: u32,
    /// Number of results per window.
    pub max_results: u32,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            start_at: 0,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl SearchQuery {
    /// Create a query for a specific window.
    #[must_use]
    pub fn window(start_at: u32, max_results: u32) -> Self {
        Self {
            start_at,
            max_results,
        }
    }

    /// Create a query for a zero-based page index.
    #[must_use]
    pub fn for_page(page: u32, max_results: u32) -> Self {
        Self {
            start_at: page.saturating_mul(max_results),
            max_results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_reference_example() {
        let p = Pagination::compute(95, 20, 25).unwrap();
        assert_eq!(p.page_count, 4);
        assert_eq!(p.page, 1);
        assert_eq!(p.pages, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_compute_exact_multiple() {
        let p = Pagination::compute(100, 50, 50).unwrap();
        assert_eq!(p.page_count, 2);
        assert_eq!(p.page, 1);
        assert_eq!(p.pages, vec![0, 1]);
    }

    #[test]
    fn test_compute_empty_result() {
        let p = Pagination::compute(0, 0, 50).unwrap();
        assert_eq!(p.page_count, 0);
        assert_eq!(p.page, 0);
        assert!(p.pages.is_empty());
        assert!(!p.has_next());
    }

    #[test]
    fn test_compute_matches_ceiling_for_many_inputs() {
        for total in 0..120u32 {
            for max_results in 1..30u32 {
                let p = Pagination::compute(total, 0, max_results).unwrap();
                let expected = (f64::from(total) / f64::from(max_results)).ceil() as u32;
                assert_eq!(p.page_count, expected, "total={total} max={max_results}");
                assert_eq!(p.pages.len() as u32, expected);
                assert_eq!(p.pages.last().copied(), expected.checked_sub(1));
            }
        }
    }

    #[test]
    fn test_zero_max_results_is_rejected() {
        let err = Pagination::compute(10, 0, 0).unwrap_err();
        assert!(matches!(err, JiraError::InvalidPagination { max_results: 0 }));
    }

    #[test]
    fn test_huge_total_is_refused() {
        let err = Pagination::compute(u32::MAX, 0, 1).unwrap_err();
        assert!(matches!(
            err,
            JiraError::PageLimitExceeded {
                page_count: u32::MAX,
                limit: MAX_PAGE_COUNT
            }
        ));

        let at_limit = Pagination::compute(MAX_PAGE_COUNT, 0, 1).unwrap();
        assert_eq!(at_limit.pages.len() as u32, MAX_PAGE_COUNT);
    }

    #[test]
    fn test_next_start_at() {
        let p = Pagination::compute(95, 50, 25).unwrap();
        assert_eq!(p.next_start_at(), Some(75));

        let last = Pagination::compute(95, 75, 25).unwrap();
        assert_eq!(last.next_start_at(), None);
    }

    #[test]
    fn test_search_query_for_page() {
        assert_eq!(SearchQuery::for_page(3, 25), SearchQuery::window(75, 25));
        assert_eq!(SearchQuery::default().max_results, DEFAULT_MAX_RESULTS);
    }
}
