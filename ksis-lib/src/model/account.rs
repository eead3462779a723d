//! Account rows.

use serde::Deserialize;
use serde::Serialize;

use super::Keyed;

/// A dashboard account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Login id, also the durable key.
    pub account_id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    /// Deactivated accounts cannot log in.
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub reg_date: Option<String>,
}

impl Keyed for Account {
    type Id = String;

    fn id(&self) -> String {
        self.account_id.clone()
    }
}
