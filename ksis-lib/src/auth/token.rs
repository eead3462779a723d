//! TokenProvider trait and AccessToken

use std::sync::Arc;
use std::sync::PoisonError;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use super::UserContext;
use crate::error::AuthError;

/// A KSIS access token (a JWT issued by the login endpoint).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    /// The bearer token used for API authentication.
    pub access_token: String,
    /// When the token expires, if known.
    pub expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Creates a new access token with just the token string.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at: None,
        }
    }

    /// Creates a new access token with expiration time.
    pub fn with_expiry(access_token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at: Some(expires_at),
        }
    }

    /// Creates a token whose expiry is read from its own `exp` claim.
    pub fn from_jwt(access_token: impl Into<String>) -> Result<Self, AuthError> {
        let access_token = access_token.into();
        let context = UserContext::from_jwt(&access_token)?;
        Ok(Self {
            access_token,
            expires_at: context.expires_at,
        })
    }

    /// Returns `true` if the token has expired.
    ///
    /// Returns `false` if expiration time is unknown.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| Utc::now() >= exp)
    }

    /// Decodes the user context carried in the token's claims.
    pub fn user_context(&self) -> Result<UserContext, AuthError> {
        UserContext::from_jwt(&self.access_token)
    }
}

/// Supplies the bearer token for each request.
///
/// The client calls `get_token` before every request, so implementations
/// should return a cached token when they have one.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Gets the current access token.
    async fn get_token(&self) -> Result<AccessToken, AuthError>;
}

/// A token provider that always returns the same token.
///
/// # Example
///
/// ```
/// use ksis_lib::auth::StaticTokenProvider;
///
/// let provider = StaticTokenProvider::new("my-access-token");
/// ```
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    token: AccessToken,
}

impl StaticTokenProvider {
    /// Creates a new static token provider with the given access token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            token: AccessToken::new(access_token),
        }
    }

    /// Creates a new static token provider from an existing AccessToken.
    pub fn from_token(token: AccessToken) -> Self {
        Self { token }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn get_token(&self) -> Result<AccessToken, AuthError> {
        Ok(self.token.clone())
    }
}

/// A token slot filled at login and emptied at logout.
///
/// Cheap to clone; clones share the same slot, so a session socket can
/// clear the token that every board is using.
#[derive(Debug, Clone, Default)]
pub struct SessionTokenProvider {
    slot: Arc<RwLock<Option<AccessToken>>>,
}

impl SessionTokenProvider {
    /// Creates an empty (logged out) provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the token returned by a login.
    pub fn set(&self, token: AccessToken) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    /// Drops the current token.
    pub fn clear(&self) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Returns `true` if a token is stored.
    pub fn is_logged_in(&self) -> bool {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

#[async_trait]
impl TokenProvider for SessionTokenProvider {
    async fn get_token(&self) -> Result<AccessToken, AuthError> {
        let token = self
            .slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(AuthError::MissingToken)?;

        if token.is_expired() {
            return Err(AuthError::MissingToken);
        }
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[tokio::test]
    async fn test_session_provider_follows_login_and_logout() {
        let provider = SessionTokenProvider::new();
        let shared = provider.clone();
        assert_eq!(provider.get_token().await, Err(AuthError::MissingToken));

        shared.set(AccessToken::new("t1"));
        assert!(provider.is_logged_in());
        assert_eq!(provider.get_token().await.unwrap().access_token, "t1");

        shared.clear();
        assert!(!provider.is_logged_in());
        assert_eq!(provider.get_token().await, Err(AuthError::MissingToken));
    }

    #[tokio::test]
    async fn test_expired_token_is_not_served() {
        let provider = SessionTokenProvider::new();
        provider.set(AccessToken::with_expiry("old", Utc::now() - Duration::minutes(1)));

        assert!(provider.is_logged_in());
        assert_eq!(provider.get_token().await, Err(AuthError::MissingToken));
    }

    #[test]
    fn test_unknown_expiry_never_expires() {
        assert!(!AccessToken::new("t").is_expired());
        assert!(AccessToken::from_jwt("not-a-jwt").is_err());
    }
}
