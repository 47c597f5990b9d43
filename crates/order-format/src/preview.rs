use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use image::ImageFormat;
use serde::{Deserialize, Serialize};

use crate::errors::OrderError;

const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Serde helper: PNG bytes <-> bare base64 string.
mod png_base64 {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(png: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&STANDARD.encode(png))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        let png = STANDARD.decode(encoded).map_err(serde::de::Error::custom)?;
        super::check_png(&png).map_err(serde::de::Error::custom)?;
        Ok(png)
    }
}

/// Raster capture of the 3D view at submission time. Always a PNG.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreviewImage {
    #[serde(with = "png_base64")]
    png: Vec<u8>,
}

impl PreviewImage {
    pub fn from_png(png: Vec<u8>) -> Result<Self, OrderError> {
        check_png(&png)?;
        Ok(Self { png })
    }

    /// Accepts the output of `canvas.toDataURL("image/png")`, or bare base64.
    pub fn from_data_url(data_url: &str) -> Result<Self, OrderError> {
        let data_url = data_url.trim();
        let encoded = match data_url.strip_prefix(PNG_DATA_URL_PREFIX) {
            Some(rest) => rest,
            None if data_url.starts_with("data:") => {
                return Err(OrderError::InvalidPreview {
                    reason: "preview must be a base64 PNG data URL".to_string(),
                });
            }
            None => data_url,
        };
        let png = STANDARD
            .decode(encoded)
            .map_err(|e| OrderError::InvalidPreview {
                reason: format!("invalid base64: {e}"),
            })?;
        Self::from_png(png)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.png
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.png)
    }

    pub fn to_data_url(&self) -> String {
        format!("{PNG_DATA_URL_PREFIX}{}", self.to_base64())
    }

    /// File name of the mail attachment: `design-<customer>-<unix millis>.png`.
    pub fn attachment_name(customer: &str, at: DateTime<Utc>) -> String {
        let slug = customer
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-")
            .to_lowercase();
        let slug = if slug.is_empty() { "order".to_string() } else { slug };
        format!("design-{}-{}.png", slug, at.timestamp_millis())
    }
}

fn check_png(bytes: &[u8]) -> Result<(), OrderError> {
    match image::guess_format(bytes) {
        Ok(ImageFormat::Png) => {}
        Ok(other) => {
            return Err(OrderError::InvalidPreview {
                reason: format!("expected PNG, got {:?}", other),
            })
        }
        Err(_) => {
            return Err(OrderError::InvalidPreview {
                reason: "not an image".to_string(),
            })
        }
    }
    image::load_from_memory_with_format(bytes, ImageFormat::Png).map_err(|e| {
        OrderError::InvalidPreview {
            reason: format!("unreadable PNG: {e}"),
        }
    })?;
    Ok(())
}
