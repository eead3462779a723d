//! The query descriptor: which page of which filtered set to fetch.

use chrono::NaiveDate;
use serde::Deserialize;
use serde::Serialize;

/// An inclusive date filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a range without checking its order.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Returns `true` if `start <= end`.
    pub fn is_ordered(&self) -> bool {
        self.start <= self.end
    }
}

/// Query parameter names used by a list endpoint.
///
/// Most KSIS endpoints use the defaults; a board overrides the names its
/// backend spells differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamNames {
    pub page: &'static str,
    pub size: &'static str,
    pub search_term: &'static str,
    pub search_category: &'static str,
    pub start_time: &'static str,
    pub end_time: &'static str,
}

impl ParamNames {
    /// `page`, `size`, `searchTerm`, `searchCategory`, `startTime`, `endTime`.
    pub const DEFAULT: Self = Self {
        page: "page",
        size: "size",
        search_term: "searchTerm",
        search_category: "searchCategory",
        start_time: "startTime",
        end_time: "endTime",
    };
}

impl Default for ParamNames {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Describes the page and filters of one list request.
///
/// Compared by value: two descriptors with identical fields name the same
/// request. Only [`ListQueryController`](super::ListQueryController)
/// changes a descriptor, which is how the page-reset rules are kept.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryDescriptor {
    pub(crate) search_term: String,
    pub(crate) search_category: String,
    pub(crate) date_range: Option<DateRange>,
    pub(crate) page_number: u32,
    pub(crate) page_size: u32,
}

impl QueryDescriptor {
    /// An unfiltered descriptor for page 1.
    pub fn new(page_size: u32, search_category: impl Into<String>) -> Self {
        Self {
            search_term: String::new(),
            search_category: search_category.into(),
            date_range: None,
            page_number: 1,
            page_size,
        }
    }

    /// Free-text filter; empty means unfiltered.
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// The category the term applies to.
    pub fn search_category(&self) -> &str {
        &self.search_category
    }

    /// The date filter, present only when both bounds are set.
    pub fn date_range(&self) -> Option<DateRange> {
        self.date_range
    }

    /// 1-based page number.
    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    /// Rows per page.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// 0-based page index as the backend expects it.
    pub fn zero_based_page(&self) -> u32 {
        self.page_number.saturating_sub(1)
    }

    /// Builds the request's query parameters.
    pub fn query_pairs(&self, names: &ParamNames) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            (names.page, self.zero_based_page().to_string()),
            (names.size, self.page_size.to_string()),
            (names.search_term, self.search_term.clone()),
        ];

        if !self.search_category.is_empty() {
            pairs.push((names.search_category, self.search_category.clone()));
        }

        if let Some(range) = self.date_range {
            pairs.push((names.start_time, range.start.format("%Y-%m-%d").to_string()));
            pairs.push((names.end_time, range.end.format("%Y-%m-%d").to_string()));
        }

        pairs
    }
}
