use std::io::Cursor;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use decal_types::{Asset, AssetId, ImageSource};
use image::{ImageFormat, ImageReader};
use tracing::{info, instrument, warn};

use crate::config::UploadLimits;
use crate::types::DesignError;

/// Image formats accepted for uploaded logos.
const ACCEPTED_FORMATS: [ImageFormat; 3] = [ImageFormat::Png, ImageFormat::Jpeg, ImageFormat::WebP];

/// The selectable logos: fixed presets plus session-scoped user uploads.
#[derive(Debug, Clone)]
pub struct AssetCatalog {
    presets: Vec<Asset>,
    limits: UploadLimits,
}

impl AssetCatalog {
    pub fn new(presets: Vec<Asset>, limits: UploadLimits) -> Self {
        Self { presets, limits }
    }

    /// Catalog with the shipped preset logos.
    pub fn with_limits(limits: UploadLimits) -> Self {
        Self::new(default_presets(), limits)
    }

    /// Preset logos, in display order.
    pub fn list_preset_assets(&self) -> &[Asset] {
        &self.presets
    }

    pub fn get_preset(&self, id: &str) -> Result<&Asset, DesignError> {
        self.presets
            .iter()
            .find(|a| a.id.as_str() == id)
            .ok_or_else(|| DesignError::unknown_asset(id))
    }

    pub fn limits(&self) -> UploadLimits {
        self.limits
    }

    /// Turn an uploaded image file into an asset.
    ///
    /// The bytes must be a decodable PNG, JPEG or WebP image within the size
    /// limits. The asset embeds the image as a data URI and lives only as
    /// long as the session.
    #[instrument(skip(self, image_data), fields(bytes = image_data.len()))]
    pub fn register_uploaded_asset(&self, image_data: &[u8]) -> Result<Asset, DesignError> {
        match self.validate_upload(image_data) {
            Ok(format) => {
                let uri = format!(
                    "data:{};base64,{}",
                    format.to_mime_type(),
                    STANDARD.encode(image_data)
                );
                info!(format = ?format, "accepted uploaded logo");
                Ok(Asset {
                    id: AssetId::new(AssetId::CUSTOM),
                    name: "Custom".to_string(),
                    image: ImageSource::DataUri { uri },
                    swatch: "#333333".to_string(),
                })
            }
            Err(e) => {
                warn!(error = %e, "rejected uploaded logo");
                Err(e)
            }
        }
    }

    /// Same as [`register_uploaded_asset`](Self::register_uploaded_asset), for
    /// the `data:<mime>;base64,<payload>` string a browser file reader yields.
    pub fn register_uploaded_data_uri(&self, uri: &str) -> Result<Asset, DesignError> {
        let bytes = decode_data_uri(uri)?;
        self.register_uploaded_asset(&bytes)
    }

    fn validate_upload(&self, data: &[u8]) -> Result<ImageFormat, DesignError> {
        if data.is_empty() {
            return Err(DesignError::invalid_asset("empty upload"));
        }
        if data.len() > self.limits.max_bytes {
            return Err(DesignError::invalid_asset(format!(
                "upload is {} bytes, limit is {}",
                data.len(),
                self.limits.max_bytes
            )));
        }

        let format = image::guess_format(data)
            .map_err(|_| DesignError::invalid_asset("unrecognized image format"))?;
        if !ACCEPTED_FORMATS.contains(&format) {
            return Err(DesignError::invalid_asset(format!(
                "unsupported image format {:?}",
                format
            )));
        }

        // Header first: oversized images are refused before any pixel buffer exists.
        let (width, height) = ImageReader::with_format(Cursor::new(data), format)
            .into_dimensions()
            .map_err(|e| DesignError::invalid_asset(format!("failed to read image header: {e}")))?;
        if width == 0 || height == 0 {
            return Err(DesignError::invalid_asset("image has no pixels"));
        }
        let max = self.limits.max_dimension;
        if width > max || height > max {
            return Err(DesignError::invalid_asset(format!(
                "image is {width}x{height}, limit is {max}x{max}"
            )));
        }

        image::load_from_memory_with_format(data, format)
            .map_err(|e| DesignError::invalid_asset(format!("failed to decode image: {e}")))?;

        Ok(format)
    }
}

impl Default for AssetCatalog {
    fn default() -> Self {
        Self::with_limits(UploadLimits::default())
    }
}

/// The preset logos served from the site's texture folder.
pub fn default_presets() -> Vec<Asset> {
    vec![
        Asset {
            id: AssetId::new("mahou"),
            name: "Mahou".to_string(),
            image: ImageSource::Url {
                url: "/textures/mahou_red.png".to_string(),
            },
            swatch: "#E30613".to_string(),
        },
        Asset {
            id: AssetId::new("mahou_futbol"),
            name: "Mahou Fútbol".to_string(),
            image: ImageSource::Url {
                url: "/textures/mahou_futbol.png".to_string(),
            },
            swatch: "#FFFFFF".to_string(),
        },
    ]
}

/// Decode a base64 `data:` URI into raw bytes.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>, DesignError> {
    let rest = uri
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| DesignError::invalid_asset("not a data URI"))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| DesignError::invalid_asset("data URI has no payload"))?;
    if !header.ends_with(";base64") {
        return Err(DesignError::invalid_asset("data URI is not base64-encoded"));
    }
    STANDARD
        .decode(payload.trim())
        .map_err(|e| DesignError::invalid_asset(format!("invalid base64 payload: {e}")))
}
