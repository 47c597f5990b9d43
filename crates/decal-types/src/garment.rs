use serde::{Deserialize, Serialize};

/// Coarse logo scale selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeTier {
    Small,
    #[default]
    Medium,
    Large,
}

impl SizeTier {
    pub const ALL: [SizeTier; 3] = [SizeTier::Small, SizeTier::Medium, SizeTier::Large];

    /// Parse a tier from its lowercase name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "small" => Some(SizeTier::Small),
            "medium" => Some(SizeTier::Medium),
            "large" => Some(SizeTier::Large),
            _ => None,
        }
    }

    /// Map the numeric slider index (0, 1, 2) to a tier.
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    pub fn name(&self) -> &'static str {
        match self {
            SizeTier::Small => "small",
            SizeTier::Medium => "medium",
            SizeTier::Large => "large",
        }
    }

    /// Label used on the printed order sheet.
    pub fn label(&self) -> &'static str {
        match self {
            SizeTier::Small => "Pequeño",
            SizeTier::Medium => "Mediano",
            SizeTier::Large => "Grande",
        }
    }
}

/// Garment size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GarmentSize {
    XS,
    S,
    #[default]
    M,
    L,
    XL,
    XXL,
}

impl GarmentSize {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "XS" => Some(GarmentSize::XS),
            "S" => Some(GarmentSize::S),
            "M" => Some(GarmentSize::M),
            "L" => Some(GarmentSize::L),
            "XL" => Some(GarmentSize::XL),
            "XXL" => Some(GarmentSize::XXL),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GarmentSize::XS => "XS",
            GarmentSize::S => "S",
            GarmentSize::M => "M",
            GarmentSize::L => "L",
            GarmentSize::XL => "XL",
            GarmentSize::XXL => "XXL",
        }
    }
}

/// Garment cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[default]
    Male,
    Female,
    Unisex,
}

impl Gender {
    /// Accepts both the English names and the storefront's Spanish labels.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "male" | "masculino" => Some(Gender::Male),
            "female" | "femenino" => Some(Gender::Female),
            "unisex" => Some(Gender::Unisex),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Unisex => "unisex",
        }
    }
}

/// Garment choices tracked alongside the decal design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GarmentOptions {
    pub size: GarmentSize,
    pub gender: Gender,
}
