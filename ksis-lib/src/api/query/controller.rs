//! Query state for one list view.

use chrono::NaiveDate;

use super::DateRange;
use super::QueryDescriptor;
use super::SearchCategory;
use crate::error::ValidationError;

/// Holds a board's [`QueryDescriptor`] and applies the reset rules.
///
/// Any filter change (term, category, date range) sends the view back to
/// page 1. A page change leaves the filters alone.
#[derive(Debug, Clone)]
pub struct ListQueryController {
    categories: Vec<SearchCategory>,
    descriptor: QueryDescriptor,
    /// Date bounds as edited; the descriptor only carries complete ranges.
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

impl ListQueryController {
    /// Creates a controller on page 1 with the first category selected.
    pub fn new(page_size: u32, categories: impl Into<Vec<SearchCategory>>) -> Self {
        let categories = categories.into();
        let default_category = categories.first().map(|c| c.key).unwrap_or_default();
        Self {
            descriptor: QueryDescriptor::new(page_size, default_category),
            categories,
            start: None,
            end: None,
        }
    }

    /// The current descriptor.
    pub fn descriptor(&self) -> &QueryDescriptor {
        &self.descriptor
    }

    /// The categories offered by this view.
    pub fn categories(&self) -> &[SearchCategory] {
        &self.categories
    }

    /// The selected category, if it belongs to this view.
    pub fn current_category(&self) -> Option<&SearchCategory> {
        self.categories
            .iter()
            .find(|c| c.key == self.descriptor.search_category)
    }

    /// Date bounds as currently edited (either may be missing).
    pub fn date_bounds(&self) -> (Option<NaiveDate>, Option<NaiveDate>) {
        (self.start, self.end)
    }

    /// Sets the free-text term. Empty clears the filter.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.descriptor.search_term = term.into();
        self.descriptor.page_number = 1;
    }

    /// Switches category, dropping the term and date range.
    ///
    /// A term typed for one category (an id, say) is meaningless for another.
    pub fn set_search_category(&mut self, category: impl Into<String>) {
        self.descriptor.search_category = category.into();
        self.descriptor.search_term.clear();
        self.descriptor.date_range = None;
        self.start = None;
        self.end = None;
        self.descriptor.page_number = 1;
    }

    /// Sets the date bounds. The descriptor gets a range once both are set.
    pub fn set_date_range(&mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) {
        self.start = start;
        self.end = end;
        self.descriptor.date_range = match (start, end) {
            (Some(start), Some(end)) => Some(DateRange::new(start, end)),
            _ => None,
        };
        self.descriptor.page_number = 1;
    }

    /// Moves to page `n` (1-based), keeping every filter.
    ///
    /// Range checks against the total page count belong to
    /// [`Pagination::clamp`](super::Pagination::clamp); only the `>= 1`
    /// floor is applied here.
    pub fn set_page_number(&mut self, n: u32) {
        self.descriptor.page_number = n.max(1);
    }

    /// Returns to the initial, unfiltered state.
    pub fn reset(&mut self) {
        let default_category = self.categories.first().map(|c| c.key).unwrap_or_default();
        self.descriptor = QueryDescriptor::new(self.descriptor.page_size, default_category);
        self.start = None;
        self.end = None;
    }

    /// Checks the descriptor before a request is issued.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let category = &self.descriptor.search_category;
        let known = self.current_category();

        if known.is_none() && !self.categories.is_empty() {
            return Err(ValidationError::UnknownCategory {
                category: category.clone(),
            });
        }

        if known.is_some_and(|c| c.date_required) && (self.start.is_none() || self.end.is_none()) {
            return Err(ValidationError::DateRangeRequired {
                category: category.clone(),
            });
        }

        if let (Some(start), Some(end)) = (self.start, self.end)
            && start > end
        {
            return Err(ValidationError::InvertedDateRange { start, end });
        }

        Ok(())
    }
}
