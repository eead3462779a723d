//! Search categories.

/// One entry of a board's closed set of search categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchCategory {
    /// Value sent as `searchCategory`.
    pub key: &'static str,
    /// Label shown in the category selector.
    pub label: &'static str,
    /// Searching by this category needs a complete date range.
    pub date_required: bool,
    /// Only offered to administrators.
    pub admin_only: bool,
}

impl SearchCategory {
    /// A free-text category.
    pub const fn text(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            date_required: false,
            admin_only: false,
        }
    }

    /// A category that searches by date range.
    pub const fn date(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            date_required: true,
            admin_only: false,
        }
    }

    /// Restricts the category to administrators.
    pub const fn admin_only(mut self) -> Self {
        self.admin_only = true;
        self
    }
}
