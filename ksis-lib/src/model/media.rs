//! Media resources.

use serde::Deserialize;
use serde::Serialize;

use super::Keyed;

/// Which copy of an uploaded resource a row describes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// The file as uploaded.
    #[default]
    Original,
    /// A server-side encoded copy for a target resolution.
    Encoded,
}

/// Media kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MediaKind {
    Image,
    Video,
}

/// An uploaded image or video.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaFile {
    pub file_id: i64,
    pub file_title: String,
    #[serde(default)]
    pub resource_type: Option<MediaKind>,
    #[serde(default)]
    pub variant: Variant,
    /// Encoded copies name their target resolution.
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub reg_date: Option<String>,
}

impl Keyed for MediaFile {
    type Id = i64;

    fn id(&self) -> i64 {
        self.file_id
    }
}
