//! Validation error types

use chrono::NaiveDate;

/// Local, pre-request validation failures.
///
/// These are raised before any request is issued and carry a message that
/// can be shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The selected category needs both a start and an end date.
    #[error("Searching by '{category}' requires both a start and an end date")]
    DateRangeRequired { category: String },

    /// The start date lies after the end date.
    #[error("Start date {start} is after end date {end}")]
    InvertedDateRange { start: NaiveDate, end: NaiveDate },

    /// The category is not one the board offers.
    #[error("Unknown search category '{category}'")]
    UnknownCategory { category: String },

    /// A bulk action was requested with nothing selected.
    #[error("No items selected")]
    EmptySelection,

    /// A board has no action of the requested kind.
    #[error("This board does not support '{action}'")]
    UnsupportedAction { action: String },

    /// A list position outside the list was used.
    #[error("Position {index} is out of range for a list of {len}")]
    PositionOutOfRange { index: usize, len: usize },
}
