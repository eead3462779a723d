//! Main KsisClient

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use reqwest::Method;
use serde::de::DeserializeOwned;
use url::Url;

use crate::auth::TokenProvider;
use crate::auth::UserContext;
use crate::error::ApiError;
use crate::error::Error;

/// Client for the KSIS dashboard REST backend.
///
/// This client is cheap to clone (uses `Arc` internally) and is shared by
/// every board of a session.
///
/// The client never retries on its own: a failed request is returned to the
/// caller, which surfaces it to the user.
///
/// # Example
///
/// ```ignore
/// use ksis_lib::{KsisClient, auth::StaticTokenProvider};
///
/// let client = KsisClient::builder()
///     .url("https://ksis.example.com/api")
///     .token_provider(StaticTokenProvider::new(token))
///     .timeout(Duration::from_secs(10))
///     .build();
/// ```
#[derive(Clone)]
pub struct KsisClient {
    inner: Arc<KsisClientInner>,
}

struct KsisClientInner {
    base_url: String,
    token_provider: Arc<dyn TokenProvider>,
    http_client: Client,
    timeout: Option<Duration>,
}

impl std::fmt::Debug for KsisClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KsisClient")
            .field("base_url", &self.inner.base_url)
            .field("timeout", &self.inner.timeout)
            .finish_non_exhaustive()
    }
}

impl KsisClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> KsisClientBuilder<Missing, Missing> {
        KsisClientBuilder::new()
    }

    /// Returns the base URL of the backend.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Returns the per-request timeout, if one is set.
    pub fn timeout(&self) -> Option<Duration> {
        self.inner.timeout
    }

    /// Decodes the current user's claims from the token in use.
    pub async fn user_context(&self) -> Result<UserContext, Error> {
        let token = self.inner.token_provider.get_token().await?;
        Ok(token.user_context()?)
    }

    /// Resolves an endpoint path (e.g. `/notice/posts`) against the base URL.
    pub fn endpoint_url(&self, path: &str) -> Result<Url, ApiError> {
        let joined = format!(
            "{}/{}",
            self.inner.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|e| ApiError::InvalidUrl(format!("{joined}: {e}")))
    }

    /// Sends one authenticated request and checks its status.
    ///
    /// Non-2xx responses become [`ApiError::Http`] carrying the response body.
    pub(crate) async fn request(
        &self,
        method: Method,
        url: Url,
        body: Option<&serde_json::Value>,
    ) -> Result<reqwest::Response, Error> {
        let token = self.inner.token_provider.get_token().await?;

        log::debug!("{} {}", method, url);

        let mut request = self
            .inner
            .http_client
            .request(method.clone(), url.clone())
            .bearer_auth(&token.access_token);

        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = if body.trim().is_empty() {
            status.canonical_reason().unwrap_or("request failed").to_string()
        } else {
            body
        };
        log::warn!("{} {} failed with {}", method, url, status.as_u16());
        Err(Error::Api(ApiError::http(status.as_u16(), message)))
    }

    /// Sends a request and decodes its JSON body.
    pub(crate) async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<&serde_json::Value>,
    ) -> Result<T, Error> {
        let response = self.request(method, url, body).await?;
        let text = response.text().await.map_err(|e| self.transport_error(e))?;
        serde_json::from_str(&text).map_err(|e| Error::Api(ApiError::parse_with_body(e.to_string(), text)))
    }

    pub(crate) fn transport_error(&self, error: reqwest::Error) -> Error {
        if error.is_timeout() {
            Error::Api(ApiError::Timeout(self.inner.timeout.unwrap_or_default()))
        } else {
            Error::Api(ApiError::Network(error))
        }
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing a [`KsisClient`].
///
/// Uses the typestate pattern to ensure required fields are set at compile time.
///
/// # Required Fields
///
/// - `url` - The backend base URL
/// - `token_provider` - A [`TokenProvider`] implementation
pub struct KsisClientBuilder<Url, Provider> {
    url: Url,
    token_provider: Provider,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
}

impl KsisClientBuilder<Missing, Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: Missing,
            token_provider: Missing,
            timeout: None,
            connect_timeout: None,
            http_client: None,
        }
    }
}

impl Default for KsisClientBuilder<Missing, Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> KsisClientBuilder<Missing, P> {
    /// Sets the backend base URL.
    pub fn url(self, url: impl Into<String>) -> KsisClientBuilder<Set<String>, P> {
        KsisClientBuilder {
            url: Set(url.into()),
            token_provider: self.token_provider,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl<U> KsisClientBuilder<U, Missing> {
    /// Sets the token provider for authentication.
    pub fn token_provider<T: TokenProvider + 'static>(
        self,
        provider: T,
    ) -> KsisClientBuilder<U, Set<Arc<dyn TokenProvider>>> {
        KsisClientBuilder {
            url: self.url,
            token_provider: Set(Arc::new(provider) as Arc<dyn TokenProvider>),
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl<U, P> KsisClientBuilder<U, P> {
    /// Sets the request timeout. A timed-out fetch surfaces as a failed load.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// This is applied when building the HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl KsisClientBuilder<Set<String>, Set<Arc<dyn TokenProvider>>> {
    /// Builds the [`KsisClient`].
    pub fn build(self) -> Result<KsisClient, Error> {
        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                builder.build().map_err(ApiError::Network)?
            }
        };

        Ok(KsisClient {
            inner: Arc::new(KsisClientInner {
                base_url: self.url.0,
                token_provider: self.token_provider.0,
                http_client,
                timeout: self.timeout,
            }),
        })
    }
}
