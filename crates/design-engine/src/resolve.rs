use std::collections::BTreeMap;

use decal_types::{DecalTransform, RegionId, RegionPlacement, SizeTier};
use tracing::debug;

use crate::config::TierScales;
use crate::registry::RegionRegistry;
use crate::types::DesignError;

/// Maps (region, size tier) to the decal transform the renderer draws.
///
/// This is a lookup table, not a projector: positions and rotations come
/// straight from the region placements, and the scale is the tier base scale
/// multiplied by the region's own multiplier.
#[derive(Debug, Clone)]
pub struct TransformResolver {
    placements: BTreeMap<RegionId, RegionPlacement>,
    scales: TierScales,
}

impl TransformResolver {
    pub fn new(registry: &RegionRegistry, scales: TierScales) -> Self {
        let placements = registry
            .list_regions()
            .iter()
            .map(|r| (r.id.clone(), r.placement))
            .collect();
        Self { placements, scales }
    }

    /// Resolve the decal transform for a region at a size tier.
    pub fn resolve(&self, region: &str, tier: SizeTier) -> Result<DecalTransform, DesignError> {
        let placement = self
            .placements
            .get(region)
            .ok_or_else(|| DesignError::unknown_region(region))?;

        let base = self.scales.base_scale(tier);
        let transform = DecalTransform {
            position: placement.position,
            rotation: placement.rotation,
            scale: base * placement.scale_multiplier,
        };
        debug!(region, tier = tier.name(), scale = transform.scale, "resolved decal transform");
        Ok(transform)
    }

    /// The region's transform at the default (medium) tier.
    pub fn default_transform(&self, region: &str) -> Result<DecalTransform, DesignError> {
        self.resolve(region, SizeTier::default())
    }

    pub fn tier_scales(&self) -> &TierScales {
        &self.scales
    }
}
