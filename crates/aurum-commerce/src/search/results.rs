//! Listing results and pagination.

use serde::{Deserialize, Serialize};

/// Pagination info for a listing.
///
/// The page is clamped to the existing range, so requesting page 9 of a
/// 3-page listing yields page 3.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    /// Current page (1-indexed).
    pub page: usize,
    pub per_page: usize,
    /// Total number of items.
    pub total: usize,
    /// At least 1, even for an empty listing.
    pub total_pages: usize,
}

impl Pagination {
    pub fn new(page: usize, per_page: usize, total: usize) -> Self {
        let per_page = per_page.max(1);
        let total_pages = total.div_ceil(per_page).max(1);
        Self {
            page: page.clamp(1, total_pages),
            per_page,
            total,
            total_pages,
        }
    }

    /// Index of the first item of the current page.
    pub fn offset(&self) -> usize {
        (self.page - 1) * self.per_page
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Page numbers to display, a window of at most `max_visible` around the
    /// current page.
    pub fn page_numbers(&self, max_visible: usize) -> Vec<usize> {
        let max_visible = max_visible.max(1);
        if self.total_pages <= max_visible {
            return (1..=self.total_pages).collect();
        }

        let half = max_visible / 2;
        let start = self.page.saturating_sub(half).max(1);
        let end = (start + max_visible - 1).min(self.total_pages);
        let start = (end + 1).saturating_sub(max_visible).max(1);

        (start..=end).collect()
    }

    /// Get start item number (1-indexed, 0 when empty).
    pub fn start_item(&self) -> usize {
        if self.total == 0 {
            0
        } else {
            self.offset() + 1
        }
    }

    pub fn end_item(&self) -> usize {
        (self.page * self.per_page).min(self.total)
    }

    /// "Mostrando 11-20 de 45"
    pub fn summary(&self) -> String {
        format!(
            "Mostrando {}-{} de {}",
            self.start_item(),
            self.end_item(),
            self.total
        )
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, crate::search::DEFAULT_PER_PAGE, 0)
    }
}

/// One page of a listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, pagination: Pagination) -> Self {
        Self { items, pagination }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), Pagination::default())
    }

    /// Slice an already-filtered list.
    pub fn slice(all: Vec<T>, page: usize, per_page: usize) -> Self {
        let pagination = Pagination::new(page, per_page, all.len());
        let items = all
            .into_iter()
            .skip(pagination.offset())
            .take(pagination.per_page)
            .collect();
        Self::new(items, pagination)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::empty()
    }
}
