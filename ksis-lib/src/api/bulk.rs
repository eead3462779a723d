//! Bulk actions over selected rows.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use super::id_value;
use crate::KsisClient;
use crate::error::ApiError;
use crate::error::BulkActionError;
use crate::error::Error;

/// What a bulk action does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BulkKind {
    Delete,
    Activate,
    Deactivate,
}

impl BulkKind {
    /// Name used in messages.
    pub fn label(&self) -> &'static str {
        match self {
            BulkKind::Delete => "delete",
            BulkKind::Activate => "activate",
            BulkKind::Deactivate => "deactivate",
        }
    }

    fn method(&self) -> Method {
        match self {
            BulkKind::Delete => Method::DELETE,
            BulkKind::Activate | BulkKind::Deactivate => Method::POST,
        }
    }
}

/// How the selected ids travel to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestShape {
    /// One request per id: `<endpoint>/<id>`.
    PerId,
    /// One request: `<endpoint>?<param>=1,2,3`.
    CommaJoined { param: &'static str },
    /// One request with a JSON array body.
    JsonArray,
}

/// A bulk action a board offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkAction {
    pub kind: BulkKind,
    pub endpoint: &'static str,
    pub shape: RequestShape,
}

impl BulkAction {
    /// Creates an action.
    pub const fn new(kind: BulkKind, endpoint: &'static str, shape: RequestShape) -> Self {
        Self {
            kind,
            endpoint,
            shape,
        }
    }
}

/// Runs bulk actions.
#[async_trait]
pub trait BulkExecutor: Send + Sync {
    /// Applies `action` to `ids` and returns the ids the backend confirmed.
    ///
    /// Anything short of full success is a [`BulkActionError`].
    async fn execute(&self, action: &BulkAction, ids: &[String]) -> Result<Vec<String>, Error>;
}

/// Runs bulk actions against the KSIS backend.
#[derive(Debug, Clone)]
pub struct HttpBulkExecutor {
    client: KsisClient,
}

impl HttpBulkExecutor {
    /// Creates an executor sharing `client`.
    pub fn new(client: KsisClient) -> Self {
        Self { client }
    }

    async fn per_id(&self, action: &BulkAction, ids: &[String]) -> Result<Vec<String>, Error> {
        let mut confirmed = Vec::with_capacity(ids.len());
        let mut failed = Vec::new();

        for id in ids {
            let path = format!("{}/{}", action.endpoint.trim_end_matches('/'), id);
            let url = self.client.endpoint_url(&path)?;

            match self.client.request(action.kind.method(), url, None).await {
                Ok(_) => confirmed.push(id.clone()),
                // Already gone, e.g. a retried delete.
                Err(Error::Api(e)) if action.kind == BulkKind::Delete && e.is_not_found() => {
                    log::debug!("{} {}: already absent", action.kind.label(), id);
                    confirmed.push(id.clone());
                }
                Err(e) => {
                    log::warn!("{} {} failed: {}", action.kind.label(), id, e);
                    failed.push(id.clone());
                }
            }
        }

        if failed.is_empty() {
            Ok(confirmed)
        } else {
            Err(BulkActionError::Partial {
                action: action.kind.label().to_string(),
                attempted: ids.len(),
                failed,
            }
            .into())
        }
    }

    async fn batched(&self, action: &BulkAction, ids: &[String]) -> Result<Vec<String>, Error> {
        let mut url = self.client.endpoint_url(action.endpoint)?;
        let body = match action.shape {
            RequestShape::CommaJoined { param } => {
                url.query_pairs_mut().append_pair(param, &ids.join(","));
                None
            }
            _ => Some(Value::Array(ids.iter().map(|id| id_value(id)).collect())),
        };

        let response = match self.client.request(action.kind.method(), url, body.as_ref()).await {
            Ok(response) => response,
            Err(Error::Api(e)) if action.kind == BulkKind::Delete && e.is_not_found() => {
                log::debug!("{}: batch already absent", action.kind.label());
                return Ok(ids.to_vec());
            }
            Err(e) => {
                return Err(BulkActionError::Batch {
                    action: action.kind.label().to_string(),
                    attempted: ids.len(),
                    message: e.to_string(),
                }
                .into());
            }
        };

        let text = response
            .text()
            .await
            .map_err(|e| self.client.transport_error(e))?;
        let failed = failed_ids(&text)?;

        if failed.is_empty() {
            Ok(ids.to_vec())
        } else {
            Err(BulkActionError::Partial {
                action: action.kind.label().to_string(),
                attempted: ids.len(),
                failed,
            }
            .into())
        }
    }
}

/// Ids listed under `failedIds` in a batched response.
///
/// An empty body, or one without `failedIds`, carries no per-id detail.
fn failed_ids(text: &str) -> Result<Vec<String>, Error> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let body: Value = serde_json::from_str(text)
        .map_err(|e| Error::Api(ApiError::parse_with_body(e.to_string(), text)))?;

    let failed = body
        .get("failedIds")
        .and_then(Value::as_array)
        .map(|ids| {
            ids.iter()
                .map(|v| match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect()
        })
        .unwrap_or_default();
    Ok(failed)
}

#[async_trait]
impl BulkExecutor for HttpBulkExecutor {
    async fn execute(&self, action: &BulkAction, ids: &[String]) -> Result<Vec<String>, Error> {
        log::debug!("{} {} item(s) at {}", action.kind.label(), ids.len(), action.endpoint);
        match action.shape {
            RequestShape::PerId => self.per_id(action, ids).await,
            RequestShape::CommaJoined { .. } | RequestShape::JsonArray => {
                self.batched(action, ids).await
            }
        }
    }
}
