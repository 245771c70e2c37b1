//! Paged listing filter state.
//!
//! Every listing screen keeps a search term, a status filter, and a page
//! position. Changing the search, status or page size always resets to the
//! first page. Page navigation is clamped to the pages the last response
//! reported, so an out-of-range page is never requested.

use thiserror::Error;

/// A page of listing results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Total matching records across all pages.
    pub total: u64,
}

impl<T> Page<T> {
    /// An empty page with a zero total.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Number of pages needed for `total` records, never less than one.
#[must_use]
pub fn total_pages(total: u64, page_size: u32) -> u32 {
    let page_size = u64::from(page_size.max(1));
    let pages = total.div_ceil(page_size).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Page navigation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("page {requested} is outside 1..={total_pages}")]
pub struct PageOutOfRange {
    pub requested: u32,
    pub total_pages: u32,
}

/// Search, status and page position for one listing screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListFilter<S> {
    search_term: String,
    status: S,
    page_number: u32,
    page_size: u32,
    total: u64,
}

impl<S: Default> ListFilter<S> {
    /// A filter on page 1 with no search, default status and `page_size`.
    #[must_use]
    pub fn new(page_size: u32) -> Self {
        Self {
            search_term: String::new(),
            status: S::default(),
            page_number: 1,
            page_size: page_size.max(1),
            total: 0,
        }
    }
}

impl<S> ListFilter<S> {
    #[must_use]
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Search term to send, or `None` when blank.
    #[must_use]
    pub fn search_query(&self) -> Option<&str> {
        let trimmed = self.search_term.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    #[must_use]
    pub const fn status(&self) -> &S {
        &self.status
    }

    #[must_use]
    pub const fn page_number(&self) -> u32 {
        self.page_number
    }

    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Total records reported by the last response.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    #[must_use]
    pub fn total_pages(&self) -> u32 {
        total_pages(self.total, self.page_size)
    }

    /// Set the search term and go back to page 1.
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.page_number = 1;
    }

    /// Set the status filter and go back to page 1.
    pub fn set_status(&mut self, status: S) {
        self.status = status;
        self.page_number = 1;
    }

    /// Set the page size and go back to page 1.
    pub fn set_page_size(&mut self, page_size: u32) {
        self.page_size = page_size.max(1);
        self.page_number = 1;
    }

    /// Record the total reported by a response.
    ///
    /// If the current page no longer exists it moves to the last page.
    pub fn record_total(&mut self, total: u64) {
        self.total = total;
        self.page_number = self.page_number.min(self.total_pages());
    }

    /// Move to `page`, refusing targets outside `1..=total_pages`.
    ///
    /// # Errors
    ///
    /// Returns [`PageOutOfRange`] without changing the position.
    pub fn go_to_page(&mut self, page: u32) -> Result<(), PageOutOfRange> {
        let total_pages = self.total_pages();
        if page == 0 || page > total_pages {
            return Err(PageOutOfRange {
                requested: page,
                total_pages,
            });
        }
        self.page_number = page;
        Ok(())
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page_number < self.total_pages()
    }

    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.page_number > 1
    }

    /// Advance one page. Returns `false` (and stays put) on the last page.
    pub fn next_page(&mut self) -> bool {
        self.go_to_page(self.page_number.saturating_add(1)).is_ok()
    }

    /// Go back one page. Returns `false` (and stays put) on the first page.
    pub fn prev_page(&mut self) -> bool {
        self.go_to_page(self.page_number.saturating_sub(1)).is_ok()
    }
}
