//! Bulk action error types

/// A bulk action that did not fully succeed.
///
/// The caller keeps the selection and the last fetched page when this is
/// returned, so the user can retry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BulkActionError {
    /// The backend reported which ids failed.
    #[error("{action} failed for {} of {attempted} item(s): {}", .failed.len(), .failed.join(", "))]
    Partial {
        /// Human-readable action name.
        action: String,
        /// Number of ids submitted.
        attempted: usize,
        /// Ids the backend did not confirm.
        failed: Vec<String>,
    },

    /// The whole batch failed without per-id detail.
    #[error("{action} failed for all {attempted} item(s): {message}")]
    Batch {
        /// Human-readable action name.
        action: String,
        /// Number of ids submitted.
        attempted: usize,
        /// Error reported for the batch.
        message: String,
    },
}

impl BulkActionError {
    /// Returns the ids known to have failed, if the backend reported them.
    pub fn failed_ids(&self) -> Option<&[String]> {
        match self {
            Self::Partial { failed, .. } => Some(failed),
            Self::Batch { .. } => None,
        }
    }
}
