use decal_types::{AssetId, CameraFraming, DecalTransform, RegionId};
use design_engine::{DesignError, DesignSnapshot, TransformResolver};
use serde::{Deserialize, Serialize};

/// One decal the 3D view should composite onto the garment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecalDraw {
    pub region: RegionId,
    pub asset_id: AssetId,
    /// Texture URL or data URI.
    pub image: String,
    pub transform: DecalTransform,
}

/// Draw instructions for every occupied region, ordered by region id.
pub fn draw_list(
    snapshot: &DesignSnapshot,
    resolver: &TransformResolver,
) -> Result<Vec<DecalDraw>, DesignError> {
    snapshot
        .occupied()
        .map(|(region, asset)| {
            Ok(DecalDraw {
                region: region.clone(),
                asset_id: asset.id.clone(),
                image: asset.image.href().to_string(),
                transform: resolver.resolve(region.as_str(), snapshot.size_tier)?,
            })
        })
        .collect()
}

/// Animated camera move towards a region's framing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraTransition {
    pub from: CameraFraming,
    pub to: CameraFraming,
    pub duration_ms: u64,
}

impl CameraTransition {
    pub fn new(from: CameraFraming, to: CameraFraming, duration_ms: u64) -> Self {
        Self {
            from,
            to,
            duration_ms,
        }
    }

    /// Eased progress in [0, 1] after `elapsed_ms`.
    pub fn progress(&self, elapsed_ms: f64) -> f64 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        let t = (elapsed_ms / self.duration_ms as f64).clamp(0.0, 1.0);
        ease_out_cubic(t)
    }

    /// Camera framing after `elapsed_ms`. Holds at `to` once finished.
    pub fn sample(&self, elapsed_ms: f64) -> CameraFraming {
        self.from.lerp(&self.to, self.progress(elapsed_ms))
    }

    pub fn is_finished(&self, elapsed_ms: f64) -> bool {
        elapsed_ms >= self.duration_ms as f64
    }
}

fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}
