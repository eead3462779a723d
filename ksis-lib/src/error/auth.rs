//! Authentication error types

/// Errors raised while obtaining a token or reading its claims.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No token is available (not logged in, or the session was dropped).
    #[error("No access token available")]
    MissingToken,

    /// The token is not a three-part JWT or its payload is not valid base64.
    #[error("Malformed token: {0}")]
    MalformedToken(String),

    /// The payload decoded but the claims could not be read.
    #[error("Token claims parse error: {0}")]
    Claims(String),

    /// The token carries neither `accountId` nor `sub`.
    #[error("Token has no account id claim")]
    MissingAccountId,

    /// The token provider failed for another reason.
    #[error("Token provider error: {0}")]
    Provider(String),
}
