//! API error types

use std::time::Duration;

/// Errors that can occur while talking to the KSIS backend.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Non-2xx response from the backend.
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body, or the status reason when the body was empty.
        message: String,
    },

    /// Network error during the request.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Request timed out.
    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    /// Invalid URL provided or built from an endpoint.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Response body could not be decoded.
    #[error("Response parse error: {message}")]
    Parse {
        /// Description of the parse error.
        message: String,
        /// Raw response body, if available.
        body: Option<String>,
    },
}

impl ApiError {
    /// Creates a new HTTP error.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Creates a new parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: None,
        }
    }

    /// Creates a new parse error with the raw response body.
    pub fn parse_with_body(message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: Some(body.into()),
        }
    }

    /// Returns the HTTP status code if this is an HTTP error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` for a 404 response.
    ///
    /// Bulk deletes treat this as "already gone" rather than a failure.
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }
}
