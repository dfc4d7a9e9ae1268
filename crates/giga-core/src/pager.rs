//! Client-side pagination over an already materialized result set
//!
//! The pager never owns the data or the page state. Callers hand it the full
//! list they fetched and a mutable borrow of their own [`PageState`]; every
//! navigation operation writes the clamped result back into that state.
//!
//! ```
//! use giga_core::pager::{PageState, Pager};
//!
//! let tickets: Vec<u32> = (0..12).collect();
//! let mut state = PageState::new(1, 5);
//!
//! let mut pager = Pager::new(&tickets, &mut state);
//! assert_eq!(pager.total_pages(), 3);
//! pager.go_to_page(99);
//! assert_eq!(pager.slice(), &[10, 11]);
//! assert_eq!(state.current_page, 3);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Page size used by the dashboards when nothing else is configured
pub const DEFAULT_ITEMS_PER_PAGE: u32 = 5;

/// First page number; pages are 1-indexed
pub const FIRST_PAGE: u32 = 1;

/// Number of pages needed to show `len` items, `items_per_page` at a time
///
/// Returns `0` for an empty list. A page size of `0` is treated as `1`.
#[must_use]
pub fn total_pages(len: usize, items_per_page: u32) -> u32 {
    let size = usize::try_from(items_per_page.max(1)).unwrap_or(usize::MAX);
    u32::try_from(len.div_ceil(size)).unwrap_or(u32::MAX)
}

/// Clamp a requested page into `[1, max(total_pages, 1)]`
#[must_use]
pub fn clamp_page(page: i64, total_pages: u32) -> u32 {
    let last = i64::from(total_pages.max(FIRST_PAGE));
    u32::try_from(page.clamp(i64::from(FIRST_PAGE), last)).unwrap_or(FIRST_PAGE)
}

/// Caller-owned pagination state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageState {
    /// Current page (1-based)
    pub current_page: u32,

    /// Number of items shown per page
    pub items_per_page: u32,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            current_page: FIRST_PAGE,
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
        }
    }
}

impl PageState {
    /// Create a state, lifting zero values to `1`
    #[must_use]
    pub const fn new(current_page: u32, items_per_page: u32) -> Self {
        Self {
            current_page: if current_page == 0 { FIRST_PAGE } else { current_page },
            items_per_page: if items_per_page == 0 { 1 } else { items_per_page },
        }
    }

    /// Effective page size, never zero
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        if self.items_per_page == 0 {
            1
        } else {
            self.items_per_page
        }
    }

    /// State after jumping to `page` over a list of `len` items
    #[must_use]
    pub fn go_to(self, page: i64, len: usize) -> Self {
        Self {
            current_page: clamp_page(page, total_pages(len, self.page_size())),
            items_per_page: self.page_size(),
        }
    }

    /// State after moving one page forward
    #[must_use]
    pub fn next(self, len: usize) -> Self {
        self.go_to(i64::from(self.current_page) + 1, len)
    }

    /// State after moving one page back
    #[must_use]
    pub fn previous(self, len: usize) -> Self {
        self.go_to(i64::from(self.current_page) - 1, len)
    }

    /// State after changing the page size, re-clamped against the new total
    #[must_use]
    pub fn with_items_per_page(self, items_per_page: u32, len: usize) -> Self {
        Self {
            current_page: self.current_page,
            items_per_page: items_per_page.max(1),
        }
        .go_to(i64::from(self.current_page), len)
    }

    /// Index range of the current page within a list of `len` items
    ///
    /// The range is empty when the current page lies past the end of the
    /// data, which happens when the list shrank since the last navigation.
    #[must_use]
    pub fn bounds(&self, len: usize) -> Range<usize> {
        let size = usize::try_from(self.page_size()).unwrap_or(usize::MAX);
        let page = usize::try_from(self.current_page.max(FIRST_PAGE)).unwrap_or(usize::MAX);
        let start = (page - 1).saturating_mul(size);
        if start >= len {
            return len..len;
        }
        start..start.saturating_add(size).min(len)
    }
}

/// Navigation over a borrowed result set and borrowed page state
#[derive(Debug)]
pub struct Pager<'a, 's, T> {
    items: &'a [T],
    state: &'s mut PageState,
}

impl<'a, 's, T> Pager<'a, 's, T> {
    /// Bind the pager to the caller's data and state
    pub fn new(items: &'a [T], state: &'s mut PageState) -> Self {
        Self { items, state }
    }

    /// Number of pages, `0` when there are no items
    #[must_use]
    pub fn total_pages(&self) -> u32 {
        total_pages(self.items.len(), self.state.page_size())
    }

    /// Current page as stored in the caller's state
    #[must_use]
    pub fn current_page(&self) -> u32 {
        self.state.current_page
    }

    /// Effective page size
    #[must_use]
    pub fn items_per_page(&self) -> u32 {
        self.state.page_size()
    }

    /// Number of items in the full result set
    #[must_use]
    pub const fn total_items(&self) -> usize {
        self.items.len()
    }

    /// Jump to `page`, clamping out-of-range targets
    pub fn go_to_page(&mut self, page: impl Into<i64>) {
        *self.state = self.state.go_to(page.into(), self.items.len());
    }

    /// Move forward one page; stays put on the last page
    pub fn next_page(&mut self) {
        *self.state = self.state.next(self.items.len());
    }

    /// Move back one page; stays put on the first page
    pub fn previous_page(&mut self) {
        *self.state = self.state.previous(self.items.len());
    }

    /// Change the page size and pull the current page back into range
    pub fn set_items_per_page(&mut self, items_per_page: u32) {
        *self.state = self
            .state
            .with_items_per_page(items_per_page, self.items.len());
    }

    /// Items on the current page
    #[must_use]
    pub fn slice(&self) -> &'a [T] {
        let bounds = self.state.bounds(self.items.len());
        self.items.get(bounds).unwrap_or_default()
    }

    /// Widget model for rendering previous/next controls
    #[must_use]
    pub fn controls(&self) -> PageControls {
        PageControls::new(self.state.current_page, self.total_pages())
    }

    /// Metadata for paginated API responses
    #[must_use]
    pub fn info(&self) -> PageInfo {
        let total_pages = self.total_pages();
        let page = self.state.current_page;
        PageInfo {
            page,
            per_page: self.state.page_size(),
            total_count: u64::try_from(self.items.len()).unwrap_or(u64::MAX),
            total_pages,
            has_next: page < total_pages,
            has_prev: page > FIRST_PAGE,
        }
    }
}

/// What a pagination widget needs to draw itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageControls {
    /// Current page (1-based)
    pub current_page: u32,
    /// Total number of pages
    pub total_pages: u32,
    /// Whether the "Previous" button is enabled
    pub has_prev: bool,
    /// Whether the "Next" button is enabled
    pub has_next: bool,
}

impl PageControls {
    /// Build the widget model for a page position
    ///
    /// A stale page (past the end after the list shrank) is shown as the
    /// last page, so the widget never reads "Page 4 of 1".
    #[must_use]
    pub const fn new(current_page: u32, total_pages: u32) -> Self {
        let last = if total_pages > FIRST_PAGE { total_pages } else { FIRST_PAGE };
        let current_page = if current_page < FIRST_PAGE {
            FIRST_PAGE
        } else if current_page > last {
            last
        } else {
            current_page
        };
        Self {
            current_page,
            total_pages,
            has_prev: current_page > FIRST_PAGE,
            has_next: current_page < total_pages,
        }
    }

    /// Text shown between the buttons; an empty list reads "Page 1 of 1"
    #[must_use]
    pub fn label(&self) -> String {
        format!(
            "Page {} of {}",
            self.current_page.max(FIRST_PAGE),
            self.total_pages.max(FIRST_PAGE)
        )
    }

    /// Page a "Previous" click should navigate to, if enabled
    #[must_use]
    pub const fn prev_target(&self) -> Option<u32> {
        if self.has_prev {
            Some(self.current_page - 1)
        } else {
            None
        }
    }

    /// Page a "Next" click should navigate to, if enabled
    #[must_use]
    pub const fn next_target(&self) -> Option<u32> {
        if self.has_next {
            Some(self.current_page + 1)
        } else {
            None
        }
    }
}

/// Pagination information for API responses
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageInfo {
    /// Current page number (1-based)
    pub page: u32,

    /// Number of items per page
    pub per_page: u32,

    /// Total number of items
    pub total_count: u64,

    /// Total number of pages
    pub total_pages: u32,

    /// Whether there are more pages
    pub has_next: bool,

    /// Whether there are previous pages
    pub has_prev: bool,
}
