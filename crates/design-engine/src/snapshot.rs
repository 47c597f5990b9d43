use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use decal_types::{Asset, GarmentOptions, RegionId, SizeTier};
use serde::{Deserialize, Serialize};

/// An immutable copy of the design, for export, persistence and rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignSnapshot {
    /// One slot per registered region; `None` means the slot is empty.
    pub applied_logos: BTreeMap<RegionId, Option<Asset>>,
    #[serde(default)]
    pub selected_region: Option<RegionId>,
    #[serde(default)]
    pub size_tier: SizeTier,
    #[serde(default)]
    pub garment: GarmentOptions,
    pub taken_at: DateTime<Utc>,
}

impl DesignSnapshot {
    /// Occupied slots, in region id order.
    pub fn occupied(&self) -> impl Iterator<Item = (&RegionId, &Asset)> {
        self.applied_logos
            .iter()
            .filter_map(|(region, slot)| slot.as_ref().map(|asset| (region, asset)))
    }

    pub fn logo_count(&self) -> usize {
        self.occupied().count()
    }

    /// Mirrors `DesignState::can_submit`.
    pub fn has_logos(&self) -> bool {
        self.occupied().next().is_some()
    }

    pub fn applied(&self, region: &str) -> Option<&Asset> {
        self.applied_logos.get(region).and_then(|slot| slot.as_ref())
    }
}
