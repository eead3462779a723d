//! API key bookkeeping.

use serde::Deserialize;
use serde::Serialize;

use super::Keyed;

/// An issued API key and its quota.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKey {
    pub api_id: i64,
    pub api_key: String,
    #[serde(default)]
    pub custom_id: Option<String>,
    #[serde(default)]
    pub expiry_date: Option<String>,
    /// Remaining calls, when the key is metered.
    #[serde(default)]
    pub data_limit: Option<i64>,
}

impl Keyed for ApiKey {
    type Id = i64;

    fn id(&self) -> i64 {
        self.api_id
    }
}
