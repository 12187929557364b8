/// Offset pagination helpers
///
/// Listing endpoints take a 1-based page number plus a page size and return
/// the page together with the total count, the computed skip, and
/// `total_pages = ceil(total_count / page_size)`.
///
/// # Example
///
/// ```
/// use teamhub_shared::pagination::PageRequest;
///
/// let page = PageRequest::new(10, 3);
/// assert_eq!(page.skip(), 20);
/// assert_eq!(page.total_pages(25), 3);
/// ```
use serde::{Deserialize, Serialize};

/// Default page size for listing endpoints
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Largest page size a client may request
pub const MAX_PAGE_SIZE: i64 = 100;

/// A pagination request: 1-based page number and page size
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PageRequest {
    pub page_size: i64,
    pub page_number: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            page_number: 1,
        }
    }
}

impl PageRequest {
    /// Creates a page request, clamping the page size to
    /// `1..=MAX_PAGE_SIZE` and the page number to at least 1
    pub fn new(page_size: i64, page_number: i64) -> Self {
        Self {
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
            page_number: page_number.max(1),
        }
    }

    /// Number of rows to skip: `(page_number - 1) * page_size`
    ///
    /// Saturates rather than overflowing; the page number comes straight
    /// from the query string and is otherwise unbounded.
    pub fn skip(&self) -> i64 {
        self.page_number
            .saturating_sub(1)
            .saturating_mul(self.page_size)
    }

    /// Total page count for a given total row count
    pub fn total_pages(&self, total_count: i64) -> i64 {
        (total_count + self.page_size - 1) / self.page_size
    }

    /// Builds the response metadata for a completed query
    pub fn meta(&self, total_count: i64) -> PageMeta {
        PageMeta {
            page_size: self.page_size,
            page_number: self.page_number,
            total_count,
            total_pages: self.total_pages(total_count),
            skip: self.skip(),
        }
    }
}

/// Pagination metadata returned alongside a page of results
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page_size: i64,
    pub page_number: i64,
    pub total_count: i64,
    pub total_pages: i64,
    pub skip: i64,
}

/// A page of results with its metadata
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_and_total_pages() {
        // total=25, size=10, page=3 → skip=20, total_pages=3
        let page = PageRequest::new(10, 3);
        assert_eq!(page.skip(), 20);
        assert_eq!(page.total_pages(25), 3);
    }

    #[test]
    fn test_first_page_has_zero_skip() {
        assert_eq!(PageRequest::new(10, 1).skip(), 0);
    }

    #[test]
    fn test_exact_multiple_total() {
        let page = PageRequest::new(10, 1);
        assert_eq!(page.total_pages(30), 3);
        assert_eq!(page.total_pages(0), 0);
    }

    #[test]
    fn test_degenerate_values_clamped() {
        let page = PageRequest::new(0, 0);
        assert_eq!(page.page_size, 1);
        assert_eq!(page.page_number, 1);
        assert_eq!(page.skip(), 0);
    }

    #[test]
    fn test_huge_page_number_saturates() {
        let page = PageRequest::new(10, i64::MAX);
        assert_eq!(page.skip(), i64::MAX);
        assert!(page.meta(0).skip >= 0);
    }

    #[test]
    fn test_page_size_clamped_to_max() {
        let page = PageRequest::new(i64::MAX, 2);
        assert_eq!(page.page_size, MAX_PAGE_SIZE);
        assert_eq!(page.skip(), MAX_PAGE_SIZE);
    }

    #[test]
    fn test_meta_roundup() {
        let meta = PageRequest::new(10, 2).meta(21);
        assert_eq!(meta.total_pages, 3);
        assert_eq!(meta.skip, 10);
        assert_eq!(meta.total_count, 21);
    }
}
