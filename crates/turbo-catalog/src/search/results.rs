//! Listing pages and pagination.

use serde::{Deserialize, Serialize};

use crate::search::FilterSpec;

/// Page size used by the storefront listings.
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Page counts at or below this show every page number.
pub const DEFAULT_PAGE_WINDOW: u32 = 7;

/// One page of entries plus the size of the full result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult<T> {
    /// The entries on this page, in plan order.
    pub items: Vec<T>,
    /// Number of entries matching the filters before pagination.
    pub total_matching: u64,
}

impl<T> PageResult<T> {
    pub fn new(items: Vec<T>, total_matching: u64) -> Self {
        Self {
            items,
            total_matching,
        }
    }

    /// Create empty results.
    pub fn empty() -> Self {
        Self::new(Vec::new(), 0)
    }

    /// Check if this page has no entries.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get number of items in this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl<T> Default for PageResult<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Pagination info for one listing page.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaginationDescriptor {
    /// Current page (1-indexed).
    pub page: u32,
    /// Items per page.
    pub page_size: u32,
    /// Total number of matching items.
    pub total_matching: u64,
    /// Total number of pages; zero when nothing matches.
    pub total_pages: u64,
    /// 1-based index of the first item shown, or 0 when nothing matches.
    pub first_item_index: u64,
    /// 1-based index of the last item shown, or 0 when nothing matches.
    pub last_item_index: u64,
    /// Whether there's a previous page.
    pub has_prev: bool,
    /// Whether there's a next page.
    pub has_next: bool,
}

impl PaginationDescriptor {
    /// Compute pagination for `page` of a result set of `total_matching` items.
    pub fn new(page: u32, page_size: u32, total_matching: u64) -> Self {
        let page = page.max(1);
        let size = u64::from(page_size.max(1));
        let total_pages = total_matching.div_ceil(size);
        let first = (u64::from(page) - 1) * size + 1;

        Self {
            page,
            page_size: page_size.max(1),
            total_matching,
            total_pages,
            first_item_index: first.min(total_matching),
            last_item_index: (u64::from(page) * size).min(total_matching),
            has_prev: page > 1,
            has_next: u64::from(page) < total_pages,
        }
    }

    /// Check if on first page.
    pub fn is_first(&self) -> bool {
        self.page == 1
    }

    /// Check if on or past the last page.
    pub fn is_last(&self) -> bool {
        u64::from(self.page) >= self.total_pages
    }

    /// Page numbers for a compact page switcher.
    ///
    /// With at most `max_full` pages every number is listed. Otherwise the
    /// first page, the last page and the pages adjacent to the current one
    /// are listed, with an ellipsis in each gap.
    pub fn page_links(&self, max_full: u32) -> Vec<PageLink> {
        let total = self.total_pages;
        if total == 0 {
            return Vec::new();
        }
        let current = u64::from(self.page).min(total);
        let link = |number: u64| PageLink::Page {
            number,
            current: number == current,
        };

        if total <= u64::from(max_full) {
            return (1..=total).map(link).collect();
        }

        let mut shown = vec![1, current.saturating_sub(1), current, current + 1, total];
        shown.retain(|n| (1..=total).contains(n));
        shown.sort_unstable();
        shown.dedup();

        let mut links = Vec::with_capacity(shown.len() * 2);
        let mut previous = 0;
        for number in shown {
            if number > previous + 1 {
                links.push(PageLink::Ellipsis);
            }
            links.push(link(number));
            previous = number;
        }
        links
    }
}

impl Default for PaginationDescriptor {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE, 0)
    }
}

/// One entry of a page switcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PageLink {
    Page { number: u64, current: bool },
    Ellipsis,
}

/// Builds pagination descriptors for listing pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageAssembler {
    page_size: u32,
    page_window: u32,
}

impl PageAssembler {
    pub fn new(page_size: u32, page_window: u32) -> Self {
        Self {
            page_size: page_size.max(1),
            page_window,
        }
    }

    /// Pagination for the page the spec asked for.
    pub fn assemble<T>(&self, result: &PageResult<T>, spec: &FilterSpec) -> PaginationDescriptor {
        PaginationDescriptor::new(spec.page(), self.page_size, result.total_matching)
    }

    /// Page switcher entries using the configured window.
    pub fn page_links(&self, pagination: &PaginationDescriptor) -> Vec<PageLink> {
        pagination.page_links(self.page_window)
    }
}

impl Default for PageAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, DEFAULT_PAGE_WINDOW)
    }
}
