//! Page arithmetic shared by every catalog query.
//!
//! The count query and the page query must agree on `skip`/`take`, so every
//! search computes a [`PageWindow`] from the total first and then fetches
//! exactly that window.

use serde::{Deserialize, Serialize};

/// Page size used by browse endpoints when the caller supplies none.
pub const DEFAULT_BROWSE_PAGE_SIZE: i64 = 10;

/// A page request after sanitising: `page_number >= 1`, `page_size >= 0`.
///
/// A `page_size` of zero is the "everything on one page" sentinel.
///
/// # Examples
///
/// ```
/// use cinefind::domain::paging::PageRequest;
///
/// let request = PageRequest::sanitize(-3, -1);
/// assert_eq!(request.page_number(), 1);
/// assert_eq!(request.page_size(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    page_number: u64,
    page_size: u64,
}

impl PageRequest {
    /// Clamps raw caller input into a valid request.
    #[must_use]
    pub fn sanitize(page_number: i64, page_size: i64) -> Self {
        Self {
            page_number: u64::try_from(page_number.max(1)).unwrap_or(1),
            page_size: u64::try_from(page_size.max(0)).unwrap_or(0),
        }
    }

    /// Single page containing every result.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            page_number: 1,
            page_size: 0,
        }
    }

    #[must_use]
    pub const fn page_number(&self) -> u64 {
        self.page_number
    }

    #[must_use]
    pub const fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Resolves this request against the number of matching rows.
    #[must_use]
    pub fn window(&self, total_results: u64) -> PageWindow {
        if self.page_size == 0 {
            return PageWindow {
                total_results,
                page_number: 1,
                page_size: 0,
                page_count: 1,
            };
        }

        let page_count = total_results.div_ceil(self.page_size);
        let page_number = self.page_number.min(page_count).max(1);

        PageWindow {
            total_results,
            page_number,
            page_size: self.page_size,
            page_count,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::all()
    }
}

/// The resolved slice of a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub total_results: u64,
    pub page_number: u64,
    pub page_size: u64,
    pub page_count: u64,
}

impl PageWindow {
    /// Rows to skip before the page starts. Zero for the sentinel page.
    #[must_use]
    pub const fn skip(&self) -> u64 {
        (self.page_number - 1) * self.page_size
    }

    /// Row limit for the page, `None` meaning unbounded.
    #[must_use]
    pub const fn take(&self) -> Option<u64> {
        if self.page_size == 0 {
            None
        } else {
            Some(self.page_size)
        }
    }
}

/// One page of results plus the metadata needed to request the others.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultPage<T> {
    pub results: Vec<T>,
    pub total_results: u64,
    pub page_number: u64,
    pub page_size: u64,
    pub page_count: u64,
}

impl<T> ResultPage<T> {
    #[must_use]
    pub fn new(results: Vec<T>, window: PageWindow) -> Self {
        Self {
            results,
            total_results: window.total_results,
            page_number: window.page_number,
            page_size: window.page_size,
            page_count: window.page_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_never_goes_below_bounds() {
        for page in -5..=5 {
            for size in -5..=5 {
                let request = PageRequest::sanitize(page, size);
                assert!(request.page_number() >= 1);
                assert_eq!(request.page_size(), u64::try_from(size.max(0)).unwrap());
            }
        }

        let extreme = PageRequest::sanitize(i64::MIN, i64::MIN);
        assert_eq!(extreme, PageRequest::all());
    }

    #[test]
    fn page_count_is_ceiling_of_total_over_size() {
        for total in 0..40u64 {
            for size in 1..8i64 {
                let window = PageRequest::sanitize(1, size).window(total);
                let size = u64::try_from(size).unwrap();
                assert_eq!(window.page_count, total.div_ceil(size));
            }
        }
    }

    #[test]
    fn requested_page_is_clamped_to_last_page() {
        let window = PageRequest::sanitize(99, 10).window(25);
        assert_eq!(window.page_count, 3);
        assert_eq!(window.page_number, 3);
        assert_eq!(window.skip(), 20);
        assert_eq!(window.take(), Some(10));
    }

    #[test]
    fn empty_result_set_reports_page_one() {
        let window = PageRequest::sanitize(4, 10).window(0);
        assert_eq!(window.page_count, 0);
        assert_eq!(window.page_number, 1);
        assert_eq!(window.skip(), 0);
    }

    #[test]
    fn zero_page_size_is_a_single_page_of_everything() {
        for total in [0, 1, 17, 1000] {
            let window = PageRequest::sanitize(7, 0).window(total);
            assert_eq!(window.page_number, 1);
            assert_eq!(window.page_count, 1);
            assert_eq!(window.skip(), 0);
            assert_eq!(window.take(), None);
        }
    }

    #[test]
    fn last_partial_page_skips_full_pages() {
        let window = PageRequest::sanitize(3, 3).window(7);
        assert_eq!(window.page_count, 3);
        assert_eq!(window.skip(), 6);
        assert_eq!(window.take(), Some(3));
    }

    #[test]
    fn result_page_serializes_camel_case() {
        let page = ResultPage::new(vec!["Action"], PageRequest::all().window(1));
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["totalResults"], 1);
        assert_eq!(json["pageNumber"], 1);
        assert_eq!(json["pageSize"], 0);
        assert_eq!(json["pageCount"], 1);
        assert_eq!(json["results"][0], "Action");
    }
}
