//! The fetch collaborator behind a result set.

use std::marker::PhantomData;

use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;

use super::query::PageBody;
use super::query::ParamNames;
use super::query::QueryDescriptor;
use super::query::ResultPage;
use crate::KsisClient;
use crate::error::Error;

/// Produces the page a descriptor names.
///
/// The HTTP implementation is [`HttpPageFetcher`]; tests and offline views
/// plug in their own.
#[async_trait]
pub trait PageFetcher<T>: Send + Sync {
    /// Fetches one page.
    async fn fetch(&self, descriptor: &QueryDescriptor) -> Result<ResultPage<T>, Error>;
}

/// Fetches a page with `GET <endpoint>?page=..&size=..&searchTerm=..`.
///
/// Accepts both paginated and bare-array response bodies.
pub struct HttpPageFetcher<T> {
    client: KsisClient,
    endpoint: String,
    params: ParamNames,
    _item: PhantomData<fn() -> T>,
}

impl<T> HttpPageFetcher<T> {
    /// Creates a fetcher for a list endpoint path.
    pub fn new(client: KsisClient, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            params: ParamNames::DEFAULT,
            _item: PhantomData,
        }
    }

    /// Overrides the query parameter names.
    pub fn with_params(mut self, params: ParamNames) -> Self {
        self.params = params;
        self
    }
}

#[async_trait]
impl<T> PageFetcher<T> for HttpPageFetcher<T>
where
    T: DeserializeOwned + Send + 'static,
{
    async fn fetch(&self, descriptor: &QueryDescriptor) -> Result<ResultPage<T>, Error> {
        let mut url = self.client.endpoint_url(&self.endpoint)?;
        url.query_pairs_mut()
            .extend_pairs(descriptor.query_pairs(&self.params));

        let body: PageBody<T> = self.client.request_json(Method::GET, url, None).await?;
        Ok(body.into())
    }
}
