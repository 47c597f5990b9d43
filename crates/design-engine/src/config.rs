//! Runtime configuration for the customizer.

use decal_types::SizeTier;
use serde::{Deserialize, Serialize};

/// Base decal scale for each size tier, before the per-region multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierScales {
    pub small: f64,
    pub medium: f64,
    pub large: f64,
}

impl TierScales {
    pub fn base_scale(&self, tier: SizeTier) -> f64 {
        match tier {
            SizeTier::Small => self.small,
            SizeTier::Medium => self.medium,
            SizeTier::Large => self.large,
        }
    }
}

impl Default for TierScales {
    fn default() -> Self {
        Self {
            small: 0.06,
            medium: 0.09,
            large: 0.12,
        }
    }
}

/// Limits applied to user uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadLimits {
    /// Largest accepted encoded file, in bytes.
    pub max_bytes: usize,
    /// Largest accepted decoded width or height, in pixels.
    pub max_dimension: u32,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_bytes: 5 * 1024 * 1024,
            max_dimension: 4096,
        }
    }
}

/// Top-level configuration, usually handed over as JSON by the host page.
///
/// Every field is optional in the JSON form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomizerConfig {
    pub max_upload_bytes: usize,
    pub max_upload_dimension: u32,
    /// Seconds an order submission may stay in flight before it is considered lost.
    pub submission_timeout_secs: u64,
    pub camera_transition_ms: u64,
    /// Local storage key of the persisted design.
    pub storage_key: String,
    pub tier_scales: TierScales,
}

impl CustomizerConfig {
    pub fn upload_limits(&self) -> UploadLimits {
        UploadLimits {
            max_bytes: self.max_upload_bytes,
            max_dimension: self.max_upload_dimension,
        }
    }
}

impl Default for CustomizerConfig {
    fn default() -> Self {
        let limits = UploadLimits::default();
        Self {
            max_upload_bytes: limits.max_bytes,
            max_upload_dimension: limits.max_dimension,
            submission_timeout_secs: 30,
            camera_transition_ms: 1000,
            storage_key: "tshirtDesign".to_string(),
            tier_scales: TierScales::default(),
        }
    }
}
