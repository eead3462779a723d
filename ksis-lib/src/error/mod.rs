//! Error types

mod api;
mod auth;
mod bulk;
mod socket;
mod validation;

pub use api::*;
pub use auth::*;
pub use bulk::*;
pub use socket::*;
pub use validation::*;

/// Top-level error for every fallible operation in the crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport or backend failure.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Token or claim failure.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Local validation failure; no request was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A bulk action did not fully succeed.
    #[error(transparent)]
    BulkAction(#[from] BulkActionError),

    /// Resilient socket failure.
    #[error(transparent)]
    Socket(#[from] SocketError),
}

impl Error {
    /// Returns `true` if this error was raised locally before any request.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns the HTTP status code if the backend answered with one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api(api) => api.status_code(),
            _ => None,
        }
    }
}
