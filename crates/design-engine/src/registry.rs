use std::collections::HashSet;
use std::f64::consts::PI;

use decal_types::{CameraFraming, Region, RegionId, RegionPlacement};

use crate::types::DesignError;

/// The fixed catalog of placement regions on the garment.
#[derive(Debug, Clone)]
pub struct RegionRegistry {
    regions: Vec<Region>,
}

impl RegionRegistry {
    /// Build a registry, validating ids and conflict relations.
    ///
    /// Ids must be unique, every `conflicts_with` must name a registered
    /// region other than itself, and conflicts must be declared on both sides.
    pub fn new(regions: Vec<Region>) -> Result<Self, DesignError> {
        let mut seen = HashSet::new();
        for region in &regions {
            if region.id.as_str().is_empty() {
                return Err(DesignError::InvalidRegistry {
                    reason: "empty region id".to_string(),
                });
            }
            if !seen.insert(region.id.clone()) {
                return Err(DesignError::InvalidRegistry {
                    reason: format!("duplicate region id {}", region.id),
                });
            }
        }

        for region in &regions {
            let Some(other_id) = &region.conflicts_with else {
                continue;
            };
            if *other_id == region.id {
                return Err(DesignError::InvalidRegistry {
                    reason: format!("region {} conflicts with itself", region.id),
                });
            }
            let other = regions
                .iter()
                .find(|r| r.id == *other_id)
                .ok_or_else(|| DesignError::InvalidRegistry {
                    reason: format!(
                        "region {} conflicts with unregistered region {}",
                        region.id, other_id
                    ),
                })?;
            if other.conflicts_with.as_ref() != Some(&region.id) {
                return Err(DesignError::InvalidRegistry {
                    reason: format!(
                        "conflict {} -> {} is not declared in reverse",
                        region.id, other_id
                    ),
                });
            }
        }

        Ok(Self { regions })
    }

    /// The five placement regions of the short-sleeve shirt model.
    ///
    /// Placements are the tuned values of the shipped shirt mesh; the chest
    /// and both sleeves shrink to 0.6 so the decal does not clip at the seams.
    pub fn garment_default() -> Self {
        let origin = [0.0, 0.0, 0.0];
        let regions = vec![
            Region {
                id: RegionId::new("front"),
                name: "Front".to_string(),
                camera: CameraFraming::new([0.0, 0.0, 3.0], origin),
                placement: RegionPlacement {
                    position: [0.0, 0.04, 0.15],
                    rotation: [0.0, 0.0, 0.0],
                    scale_multiplier: 1.0,
                },
                conflicts_with: Some(RegionId::new("chest")),
            },
            Region {
                id: RegionId::new("chest"),
                name: "Chest".to_string(),
                camera: CameraFraming::new([0.0, 0.5, 2.5], origin),
                placement: RegionPlacement {
                    position: [0.1, 0.12, 0.13],
                    rotation: [0.0, 0.0, 0.0],
                    scale_multiplier: 0.6,
                },
                conflicts_with: Some(RegionId::new("front")),
            },
            Region {
                id: RegionId::new("back"),
                name: "Back".to_string(),
                camera: CameraFraming::new([0.0, 0.0, -3.0], origin),
                placement: RegionPlacement {
                    position: [0.0, 0.08, -0.12],
                    // Turned around so the logo does not read mirrored.
                    rotation: [0.0, PI, 0.0],
                    scale_multiplier: 1.0,
                },
                conflicts_with: None,
            },
            Region {
                id: RegionId::new("sleeve_left"),
                name: "Left Sleeve".to_string(),
                camera: CameraFraming::new([3.0, 0.0, 0.0], origin),
                placement: RegionPlacement {
                    position: [0.22, 0.08, 0.02],
                    rotation: [0.0, PI / 2.1, 0.0],
                    scale_multiplier: 0.6,
                },
                conflicts_with: None,
            },
            Region {
                id: RegionId::new("sleeve_right"),
                name: "Right Sleeve".to_string(),
                camera: CameraFraming::new([-3.0, 0.0, 0.0], origin),
                placement: RegionPlacement {
                    position: [-0.25, 0.08, 0.02],
                    rotation: [0.0, -PI / 2.1, 0.0],
                    scale_multiplier: 0.6,
                },
                conflicts_with: None,
            },
        ];

        Self { regions }
    }

    /// All regions, in display order.
    pub fn list_regions(&self) -> &[Region] {
        &self.regions
    }

    /// Look up a region by id.
    pub fn get_region(&self, id: &str) -> Result<&Region, DesignError> {
        self.regions
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| DesignError::unknown_region(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.regions.iter().any(|r| r.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &RegionId> {
        self.regions.iter().map(|r| &r.id)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

impl Default for RegionRegistry {
    fn default() -> Self {
        Self::garment_default()
    }
}
