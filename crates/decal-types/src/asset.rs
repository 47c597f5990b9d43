use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a selectable logo asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    /// Synthetic id given to every user upload.
    pub const CUSTOM: &'static str = "custom";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_custom(&self) -> bool {
        self.0 == Self::CUSTOM
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Where the image data of an asset lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ImageSource {
    /// A static file served alongside the application.
    Url { url: String },
    /// An embedded `data:` URI (user uploads).
    DataUri { uri: String },
}

impl ImageSource {
    /// The string a browser texture loader accepts.
    pub fn href(&self) -> &str {
        match self {
            ImageSource::Url { url } => url,
            ImageSource::DataUri { uri } => uri,
        }
    }
}

/// A selectable logo image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    pub name: String,
    pub image: ImageSource,
    /// Swatch color for the picker, as a CSS hex string.
    pub swatch: String,
}
