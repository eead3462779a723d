//! Device rows (PCs and signages) and display resolutions.

use serde::Deserialize;
use serde::Serialize;

use super::Keyed;

/// A managed PC or digital-signage device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub device_id: i64,
    pub device_name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub mac_address: Option<String>,
    #[serde(default)]
    pub resolution: Option<String>,
    /// Last status reported by the device.
    #[serde(default)]
    pub is_online: bool,
    #[serde(default)]
    pub reg_date: Option<String>,
}

impl Keyed for Device {
    type Id = i64;

    fn id(&self) -> i64 {
        self.device_id
    }
}

/// A display resolution offered for encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    pub resolution_id: i64,
    #[serde(default)]
    pub title: Option<String>,
    pub width: u32,
    pub height: u32,
}

impl Keyed for Resolution {
    type Id = i64;

    fn id(&self) -> i64 {
        self.resolution_id
    }
}

impl Resolution {
    /// Formats as `WIDTHxHEIGHT`.
    pub fn dimensions(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }
}
