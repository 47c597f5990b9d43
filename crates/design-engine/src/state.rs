use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use decal_types::{Asset, GarmentOptions, GarmentSize, Gender, RegionId, SizeTier};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::events::{DesignEvent, SubscriptionId, Subscribers};
use crate::registry::RegionRegistry;
use crate::snapshot::DesignSnapshot;
use crate::types::DesignError;

/// Whether a region can take a new logo right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionAvailability {
    pub region: RegionId,
    pub name: String,
    pub occupied: bool,
    pub available: bool,
    /// The occupied region that blocks this one, if any.
    pub blocked_by: Option<RegionId>,
}

/// The mutable record of a customization session.
///
/// Holds one logo slot per registered region, the staged region/asset pair,
/// and the size tier. All mutation goes through the methods below; each one
/// either succeeds completely or returns an error with the state unchanged.
/// Subscribers are notified after every successful change.
pub struct DesignState {
    registry: Arc<RegionRegistry>,
    applied_logos: BTreeMap<RegionId, Option<Asset>>,
    selected_region: Option<RegionId>,
    selected_asset: Option<Asset>,
    size_tier: SizeTier,
    garment: GarmentOptions,
    can_submit: bool,
    subscribers: Subscribers,
}

impl DesignState {
    /// Create an empty design with one slot per registered region.
    pub fn new(registry: Arc<RegionRegistry>) -> Self {
        let applied_logos = empty_slots(&registry);
        Self {
            registry,
            applied_logos,
            selected_region: None,
            selected_asset: None,
            size_tier: SizeTier::default(),
            garment: GarmentOptions::default(),
            can_submit: false,
            subscribers: Subscribers::default(),
        }
    }

    /// Rehydrate a design from a persisted snapshot.
    pub fn from_snapshot(
        registry: Arc<RegionRegistry>,
        snapshot: &DesignSnapshot,
    ) -> Result<Self, DesignError> {
        let mut state = Self::new(registry);
        state.restore(snapshot)?;
        Ok(state)
    }

    pub fn registry(&self) -> &RegionRegistry {
        &self.registry
    }

    // ── Selection ───────────────────────────────────────────────────

    /// Make `id` the selected region.
    pub fn select_region(&mut self, id: &str) -> Result<(), DesignError> {
        let region = self.registry.get_region(id)?.id.clone();
        self.selected_region = Some(region.clone());
        self.emit(DesignEvent::RegionSelected { region });
        Ok(())
    }

    /// Stage an asset for the next `apply_staged`.
    pub fn select_asset(&mut self, asset: Asset) {
        let id = asset.id.clone();
        self.selected_asset = Some(asset);
        self.emit(DesignEvent::AssetStaged { asset: id });
    }

    /// Drop the staged asset without applying it.
    pub fn clear_staged(&mut self) {
        if self.selected_asset.take().is_some() {
            self.emit(DesignEvent::StagedCleared);
        }
    }

    // ── Application ─────────────────────────────────────────────────

    /// Apply the staged asset to the selected region.
    ///
    /// Needs both a selected region and a staged asset. Fails with
    /// `RegionConflict` when the region's conflicting partner holds a logo.
    /// On success the staged asset is consumed; the region stays selected.
    #[instrument(skip(self))]
    pub fn apply_staged(&mut self) -> Result<RegionId, DesignError> {
        let region = self
            .selected_region
            .clone()
            .ok_or(DesignError::NothingStaged { missing: "region" })?;
        if self.selected_asset.is_none() {
            return Err(DesignError::NothingStaged { missing: "asset" });
        }
        if let Err(e) = self.check_available(region.as_str()) {
            warn!(%region, error = %e, "refused to apply logo");
            return Err(e);
        }

        let Some(asset) = self.selected_asset.take() else {
            return Err(DesignError::NothingStaged { missing: "asset" });
        };
        let asset_id = asset.id.clone();
        self.applied_logos.insert(region.clone(), Some(asset));
        self.recompute_can_submit();
        info!(%region, asset = %asset_id, "applied logo");
        self.emit(DesignEvent::LogoApplied {
            region: region.clone(),
            asset: asset_id,
        });
        Ok(region)
    }

    /// Empty a region's slot.
    ///
    /// Returns whether a logo was removed; removing from an empty slot is a no-op.
    pub fn remove_applied(&mut self, id: &str) -> Result<bool, DesignError> {
        let region = self.registry.get_region(id)?.id.clone();
        let removed = self
            .applied_logos
            .get_mut(&region)
            .and_then(|slot| slot.take())
            .is_some();
        if !removed {
            return Ok(false);
        }
        self.recompute_can_submit();
        info!(%region, "removed logo");
        self.emit(DesignEvent::LogoRemoved { region });
        Ok(true)
    }

    // ── Options ─────────────────────────────────────────────────────

    pub fn set_size_tier(&mut self, tier: SizeTier) {
        if self.size_tier == tier {
            return;
        }
        self.size_tier = tier;
        self.emit(DesignEvent::SizeTierChanged { tier });
    }

    /// Set the tier from its name (`small`, `medium`, `large`).
    pub fn set_size_tier_named(&mut self, name: &str) -> Result<SizeTier, DesignError> {
        let tier = SizeTier::from_name(name).ok_or_else(|| DesignError::InvalidTier {
            value: name.to_string(),
        })?;
        self.set_size_tier(tier);
        Ok(tier)
    }

    pub fn set_garment_size(&mut self, size: GarmentSize) {
        if self.garment.size == size {
            return;
        }
        self.garment.size = size;
        self.emit(DesignEvent::GarmentChanged {
            garment: self.garment,
        });
    }

    pub fn set_gender(&mut self, gender: Gender) {
        if self.garment.gender == gender {
            return;
        }
        self.garment.gender = gender;
        self.emit(DesignEvent::GarmentChanged {
            garment: self.garment,
        });
    }

    // ── Queries ─────────────────────────────────────────────────────

    pub fn applied(&self, region: &str) -> Option<&Asset> {
        self.applied_logos.get(region).and_then(|slot| slot.as_ref())
    }

    pub fn applied_logos(&self) -> &BTreeMap<RegionId, Option<Asset>> {
        &self.applied_logos
    }

    pub fn selected_region(&self) -> Option<&RegionId> {
        self.selected_region.as_ref()
    }

    pub fn selected_asset(&self) -> Option<&Asset> {
        self.selected_asset.as_ref()
    }

    pub fn size_tier(&self) -> SizeTier {
        self.size_tier
    }

    pub fn garment(&self) -> GarmentOptions {
        self.garment
    }

    /// True iff at least one region holds a logo.
    pub fn can_submit(&self) -> bool {
        self.can_submit
    }

    /// Whether a new logo may be applied to `region`.
    pub fn is_region_available(&self, region: &str) -> bool {
        self.check_available(region).is_ok()
    }

    /// Availability of every region, in registry order.
    pub fn region_availability(&self) -> Vec<RegionAvailability> {
        self.registry
            .list_regions()
            .iter()
            .map(|region| {
                let blocked_by = region
                    .conflicts_with
                    .as_ref()
                    .filter(|other| self.applied(other.as_str()).is_some())
                    .cloned();
                RegionAvailability {
                    region: region.id.clone(),
                    name: region.name.clone(),
                    occupied: self.applied(region.id.as_str()).is_some(),
                    available: blocked_by.is_none(),
                    blocked_by,
                }
            })
            .collect()
    }

    // ── Snapshots ───────────────────────────────────────────────────

    pub fn snapshot(&self) -> DesignSnapshot {
        self.snapshot_at(Utc::now())
    }

    pub fn snapshot_at(&self, taken_at: DateTime<Utc>) -> DesignSnapshot {
        DesignSnapshot {
            applied_logos: self.applied_logos.clone(),
            selected_region: self.selected_region.clone(),
            size_tier: self.size_tier,
            garment: self.garment,
            taken_at,
        }
    }

    /// Replace the design with a persisted snapshot.
    ///
    /// Unknown region ids fail with `UnknownRegion`; a snapshot where both
    /// sides of a conflict hold a logo fails with `RegionConflict`. The staged
    /// asset is dropped.
    #[instrument(skip_all, fields(logos = snapshot.logo_count()))]
    pub fn restore(&mut self, snapshot: &DesignSnapshot) -> Result<(), DesignError> {
        let mut applied = empty_slots(&self.registry);
        for (region, slot) in &snapshot.applied_logos {
            let entry = applied
                .get_mut(region)
                .ok_or_else(|| DesignError::unknown_region(region))?;
            *entry = slot.clone();
        }

        for region in self.registry.list_regions() {
            let Some(other) = &region.conflicts_with else {
                continue;
            };
            let occupied = |id: &RegionId| matches!(applied.get(id), Some(Some(_)));
            if occupied(&region.id) && occupied(other) {
                return Err(DesignError::RegionConflict {
                    region: region.id.clone(),
                    occupied: other.clone(),
                });
            }
        }

        if let Some(selected) = &snapshot.selected_region {
            self.registry.get_region(selected.as_str())?;
        }

        self.applied_logos = applied;
        self.selected_region = snapshot.selected_region.clone();
        self.selected_asset = None;
        self.size_tier = snapshot.size_tier;
        self.garment = snapshot.garment;
        self.recompute_can_submit();
        info!("restored design");
        self.emit(DesignEvent::Restored);
        Ok(())
    }

    /// Discard the design, keeping subscribers.
    pub fn reset(&mut self) {
        self.applied_logos = empty_slots(&self.registry);
        self.selected_region = None;
        self.selected_asset = None;
        self.size_tier = SizeTier::default();
        self.garment = GarmentOptions::default();
        self.can_submit = false;
        self.emit(DesignEvent::Reset);
    }

    // ── Notifications ───────────────────────────────────────────────

    /// Register a callback invoked after every successful change.
    pub fn subscribe(&mut self, listener: impl FnMut(&DesignEvent) + 'static) -> SubscriptionId {
        self.subscribers.add(Box::new(listener))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }

    // ── Internals ───────────────────────────────────────────────────

    fn check_available(&self, region: &str) -> Result<(), DesignError> {
        let region = self.registry.get_region(region)?;
        if let Some(other) = &region.conflicts_with {
            if self.applied(other.as_str()).is_some() {
                return Err(DesignError::RegionConflict {
                    region: region.id.clone(),
                    occupied: other.clone(),
                });
            }
        }
        Ok(())
    }

    fn recompute_can_submit(&mut self) {
        self.can_submit = self.applied_logos.values().any(Option::is_some);
    }

    fn emit(&mut self, event: DesignEvent) {
        debug!(?event, "design changed");
        self.subscribers.publish(&event);
    }
}

impl fmt::Debug for DesignState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DesignState")
            .field("applied_logos", &self.applied_logos)
            .field("selected_region", &self.selected_region)
            .field("selected_asset", &self.selected_asset)
            .field("size_tier", &self.size_tier)
            .field("garment", &self.garment)
            .field("can_submit", &self.can_submit)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

fn empty_slots(registry: &RegionRegistry) -> BTreeMap<RegionId, Option<Asset>> {
    registry.ids().map(|id| (id.clone(), None)).collect()
}
