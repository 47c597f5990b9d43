use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::placement::{CameraFraming, RegionPlacement};

/// Stable identifier of a placement region (`front`, `sleeve_left`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(String);

impl RegionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RegionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for RegionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RegionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl PartialEq<str> for RegionId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for RegionId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A named placement area on the garment.
///
/// Regions are defined once at startup and never change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: RegionId,
    /// Human-readable name shown in the UI and in order summaries.
    pub name: String,
    /// Camera framing used when this region becomes the selected one.
    pub camera: CameraFraming,
    /// Default decal placement on the garment mesh.
    pub placement: RegionPlacement,
    /// A region that cannot hold a logo at the same time as this one.
    #[serde(default)]
    pub conflicts_with: Option<RegionId>,
}
