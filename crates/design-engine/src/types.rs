use decal_types::RegionId;

/// Errors raised by the design core.
///
/// All of them are recoverable: a failed operation leaves the design untouched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DesignError {
    #[error("unknown region: {id}")]
    UnknownRegion { id: String },

    #[error("unknown asset: {id}")]
    UnknownAsset { id: String },

    #[error("invalid asset: {reason}")]
    InvalidAsset { reason: String },

    #[error("nothing staged: no {missing} selected")]
    NothingStaged { missing: &'static str },

    #[error("region {region} is blocked while {occupied} holds a logo")]
    RegionConflict { region: RegionId, occupied: RegionId },

    #[error("invalid size tier: {value}")]
    InvalidTier { value: String },

    #[error("invalid region registry: {reason}")]
    InvalidRegistry { reason: String },
}

impl DesignError {
    /// Stable tag for the UI layer.
    pub fn kind(&self) -> &'static str {
        match self {
            DesignError::UnknownRegion { .. } => "UnknownRegion",
            DesignError::UnknownAsset { .. } => "UnknownAsset",
            DesignError::InvalidAsset { .. } => "InvalidAsset",
            DesignError::NothingStaged { .. } => "NothingStaged",
            DesignError::RegionConflict { .. } => "RegionConflict",
            DesignError::InvalidTier { .. } => "InvalidTier",
            DesignError::InvalidRegistry { .. } => "InvalidRegistry",
        }
    }

    pub(crate) fn unknown_region(id: impl AsRef<str>) -> Self {
        DesignError::UnknownRegion {
            id: id.as_ref().to_string(),
        }
    }

    pub(crate) fn unknown_asset(id: impl AsRef<str>) -> Self {
        DesignError::UnknownAsset {
            id: id.as_ref().to_string(),
        }
    }

    pub(crate) fn invalid_asset(reason: impl Into<String>) -> Self {
        DesignError::InvalidAsset {
            reason: reason.into(),
        }
    }
}
