//! Access log rows.

use serde::Deserialize;
use serde::Serialize;

use super::Keyed;

/// One recorded access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessLog {
    pub log_id: i64,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub micro_service_name: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub date_time: Option<String>,
}

impl Keyed for AccessLog {
    type Id = i64;

    fn id(&self) -> i64 {
        self.log_id
    }
}
