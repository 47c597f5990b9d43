use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use decal_types::{
    Asset, AssetId, GarmentOptions, GarmentSize, Gender, ImageSource, RegionId, SizeTier,
};
use design_engine::DesignSnapshot;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::errors::SessionError;

/// Apply layout migrations from `from_version` up to `to_version`.
///
/// v1 is the unversioned layout of the earlier storefront pages; v2 is the
/// `SessionFile` layout.
pub fn migrate(raw: Value, from_version: u32, to_version: u32) -> Result<DesignSnapshot, SessionError> {
    match (from_version, to_version) {
        (1, 2) => {
            let snapshot = migrate_v1_to_v2(raw)?;
            info!(logos = snapshot.logo_count(), "migrated legacy design layout");
            Ok(snapshot)
        }
        (from, to) => Err(SessionError::MigrationFailed {
            from,
            to,
            reason: format!("no migration path from v{} to v{}", from, to),
        }),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyDesign {
    #[serde(default)]
    applied_logos: BTreeMap<String, Option<LegacyLogo>>,
    /// Slider index: 0 small, 1 medium, 2 large.
    #[serde(default, alias = "logoS")]
    logo_size: Option<u8>,
    #[serde(default, alias = "selectedSize")]
    size: Option<String>,
    #[serde(default, alias = "selectedGender")]
    gender: Option<String>,
    #[serde(default)]
    timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct LegacyLogo {
    id: String,
    #[serde(default)]
    name: Option<String>,
    url: String,
    #[serde(default)]
    color: Option<String>,
}

fn legacy_region(key: &str) -> Option<&'static str> {
    match key {
        "frente" | "FRONT" => Some("front"),
        "pecho" | "CHEST" => Some("chest"),
        "espalda" | "BACK" => Some("back"),
        "manga_izquierda" | "ARM_LEFT" => Some("sleeve_left"),
        "manga_derecha" | "ARM_RIGHT" => Some("sleeve_right"),
        _ => None,
    }
}

fn migrate_v1_to_v2(raw: Value) -> Result<DesignSnapshot, SessionError> {
    let fail = |reason: String| SessionError::MigrationFailed {
        from: 1,
        to: 2,
        reason,
    };

    let legacy: LegacyDesign =
        serde_json::from_value(raw).map_err(|e| fail(format!("unreadable legacy design: {e}")))?;

    let mut applied_logos = BTreeMap::new();
    for (key, logo) in legacy.applied_logos {
        let region = legacy_region(&key).ok_or_else(|| fail(format!("unknown legacy region {key}")))?;
        let asset = logo.map(|logo| {
            let image = if logo.url.starts_with("data:") {
                ImageSource::DataUri { uri: logo.url }
            } else {
                ImageSource::Url { url: logo.url }
            };
            Asset {
                name: logo.name.unwrap_or_else(|| logo.id.clone()),
                id: AssetId::new(logo.id),
                image,
                swatch: logo.color.unwrap_or_else(|| "#333333".to_string()),
            }
        });
        applied_logos.insert(RegionId::new(region), asset);
    }

    let size_tier = match legacy.logo_size {
        Some(index) => {
            SizeTier::from_index(index).ok_or_else(|| fail(format!("invalid logo size {index}")))?
        }
        None => SizeTier::default(),
    };
    let garment = GarmentOptions {
        size: legacy
            .size
            .as_deref()
            .and_then(GarmentSize::from_name)
            .unwrap_or_default(),
        gender: legacy
            .gender
            .as_deref()
            .and_then(Gender::from_name)
            .unwrap_or_default(),
    };

    Ok(DesignSnapshot {
        applied_logos,
        selected_region: None,
        size_tier,
        garment,
        taken_at: legacy.timestamp.unwrap_or_else(Utc::now),
    })
}
