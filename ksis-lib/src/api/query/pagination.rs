//! Pagination control state.

use std::ops::RangeInclusive;

/// The page buttons of a list view.
///
/// Buttons are shown in fixed blocks (`1..=5`, `6..=10`, ...) of `window`
/// pages. Stale page numbers from an old control are clamped here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    current: u32,
    total_pages: u32,
    window: u32,
}

impl Pagination {
    /// Default number of page buttons per block.
    pub const DEFAULT_WINDOW: u32 = 5;

    /// Creates the control for `current` of `total_pages`.
    pub fn new(current: u32, total_pages: u32) -> Self {
        let mut pagination = Self {
            current: 1,
            total_pages,
            window: Self::DEFAULT_WINDOW,
        };
        pagination.current = pagination.clamp(current);
        pagination
    }

    /// Sets the block size.
    pub fn with_window(mut self, window: u32) -> Self {
        self.window = window.max(1);
        self
    }

    /// The clamped current page.
    pub fn current(&self) -> u32 {
        self.current
    }

    /// Total number of pages.
    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Clamps a requested page into `[1, total_pages]`.
    ///
    /// With no pages at all the only valid page is 1.
    pub fn clamp(&self, requested: u32) -> u32 {
        if self.total_pages == 0 {
            1
        } else {
            requested.clamp(1, self.total_pages)
        }
    }

    /// Returns `true` if there is a page before the current one.
    pub fn has_previous(&self) -> bool {
        self.current > 1
    }

    /// Returns `true` if there is a page after the current one.
    pub fn has_next(&self) -> bool {
        self.current < self.total_pages
    }

    /// Page numbers of the block holding the current page.
    ///
    /// Empty when there are no pages.
    pub fn pages(&self) -> RangeInclusive<u32> {
        if self.total_pages == 0 {
            return 1..=0;
        }
        let start = (self.current - 1) / self.window * self.window + 1;
        let end = (start + self.window - 1).min(self.total_pages);
        start..=end
    }
}
