//! Notices.

use serde::Deserialize;
use serde::Serialize;

use super::Keyed;

/// A notice posted to devices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub notice_id: i64,
    pub title: String,
    /// Author.
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub reg_date: Option<String>,
}

impl Keyed for Notice {
    type Id = i64;

    fn id(&self) -> i64 {
        self.notice_id
    }
}
