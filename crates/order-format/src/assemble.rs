use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use decal_types::{Asset, DecalTransform, GarmentOptions, RegionId, SizeTier};
use design_engine::{DesignError, DesignSnapshot, RegionRegistry, TransformResolver};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::OrderError;
use crate::preview::PreviewImage;

/// One logo on the finished garment, with its resolved print transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedLogo {
    pub region: RegionId,
    pub region_name: String,
    pub asset: Asset,
    pub transform: DecalTransform,
}

/// The design part of an order: everything but the preview raster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDesign {
    pub order_id: Uuid,
    pub created: DateTime<Utc>,
    /// When the underlying design snapshot was taken.
    pub design_timestamp: DateTime<Utc>,
    pub size_tier: SizeTier,
    pub garment: GarmentOptions,
    /// Occupied regions, in registry order.
    pub logos: Vec<AppliedLogo>,
}

/// The finalized order handed to the submission collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderPayload {
    pub design: OrderDesign,
    pub preview: PreviewImage,
}

/// Short human-readable recap of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub total_logos: usize,
    /// `"<region name>: <asset name>"` per logo.
    pub lines: Vec<String>,
}

impl OrderPayload {
    /// The region -> asset mapping of the order.
    pub fn applied_logos(&self) -> BTreeMap<RegionId, Asset> {
        self.design
            .logos
            .iter()
            .map(|logo| (logo.region.clone(), logo.asset.clone()))
            .collect()
    }

    pub fn summary(&self) -> OrderSummary {
        OrderSummary {
            total_logos: self.design.logos.len(),
            lines: self
                .design
                .logos
                .iter()
                .map(|logo| format!("{}: {}", logo.region_name, logo.asset.name))
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, OrderError> {
        serde_json::to_string(self).map_err(|e| OrderError::Serialization {
            reason: e.to_string(),
        })
    }

    pub fn from_json(json: &str) -> Result<Self, OrderError> {
        serde_json::from_str(json).map_err(|e| OrderError::Serialization {
            reason: e.to_string(),
        })
    }
}

/// Turns a design snapshot into an order payload.
///
/// Side-effect free; sending the payload is the caller's business.
#[derive(Debug, Clone, Copy)]
pub struct OrderAssembler<'a> {
    registry: &'a RegionRegistry,
    resolver: &'a TransformResolver,
}

impl<'a> OrderAssembler<'a> {
    pub fn new(registry: &'a RegionRegistry, resolver: &'a TransformResolver) -> Self {
        Self { registry, resolver }
    }

    /// Assemble an order with a fresh id and the current time.
    pub fn assemble(
        &self,
        snapshot: &DesignSnapshot,
        preview: PreviewImage,
    ) -> Result<OrderPayload, OrderError> {
        self.assemble_at(snapshot, preview, Uuid::new_v4(), Utc::now())
    }

    /// Fails with `EmptyOrder` when no region holds a logo.
    #[instrument(skip(self, snapshot, preview))]
    pub fn assemble_at(
        &self,
        snapshot: &DesignSnapshot,
        preview: PreviewImage,
        order_id: Uuid,
        created: DateTime<Utc>,
    ) -> Result<OrderPayload, OrderError> {
        if !snapshot.has_logos() {
            return Err(OrderError::EmptyOrder);
        }
        if let Some((region, _)) = snapshot
            .occupied()
            .find(|(region, _)| !self.registry.contains(region.as_str()))
        {
            return Err(DesignError::UnknownRegion {
                id: region.to_string(),
            }
            .into());
        }

        let mut logos = Vec::with_capacity(snapshot.logo_count());
        for region in self.registry.list_regions() {
            let Some(asset) = snapshot.applied(region.id.as_str()) else {
                continue;
            };
            let transform = self.resolver.resolve(region.id.as_str(), snapshot.size_tier)?;
            logos.push(AppliedLogo {
                region: region.id.clone(),
                region_name: region.name.clone(),
                asset: asset.clone(),
                transform,
            });
        }

        info!(%order_id, logos = logos.len(), "assembled order payload");
        Ok(OrderPayload {
            design: OrderDesign {
                order_id,
                created,
                design_timestamp: snapshot.taken_at,
                size_tier: snapshot.size_tier,
                garment: snapshot.garment,
                logos,
            },
            preview,
        })
    }
}
