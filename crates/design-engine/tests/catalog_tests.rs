use std::io::Cursor;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use decal_types::*;
use design_engine::*;
use image::{ImageFormat, Rgba, RgbaImage};

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba([227, 6, 19, 255]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

// ── Presets ──────────────────────────────────────────────────────────────

#[test]
fn presets_are_listed_in_order() {
    let catalog = AssetCatalog::default();
    let ids: Vec<&str> = catalog
        .list_preset_assets()
        .iter()
        .map(|a| a.id.as_str())
        .collect();
    assert_eq!(ids, ["mahou", "mahou_futbol"]);
}

#[test]
fn unknown_preset_fails() {
    let catalog = AssetCatalog::default();
    assert!(matches!(
        catalog.get_preset("heineken"),
        Err(DesignError::UnknownAsset { .. })
    ));
}

// ── Uploads ──────────────────────────────────────────────────────────────

#[test]
fn png_upload_becomes_custom_asset() {
    let catalog = AssetCatalog::default();
    let bytes = png_bytes(8, 8);
    let asset = catalog.register_uploaded_asset(&bytes).unwrap();

    assert!(asset.id.is_custom());
    match &asset.image {
        ImageSource::DataUri { uri } => {
            assert!(uri.starts_with("data:image/png;base64,"));
            let payload = uri.trim_start_matches("data:image/png;base64,");
            assert_eq!(STANDARD.decode(payload).unwrap(), bytes);
        }
        other => panic!("expected data URI, got {other:?}"),
    }
}

#[test]
fn data_uri_upload_roundtrips() {
    let catalog = AssetCatalog::default();
    let uri = format!("data:image/png;base64,{}", STANDARD.encode(png_bytes(4, 4)));
    let asset = catalog.register_uploaded_data_uri(&uri).unwrap();
    assert_eq!(asset.image.href(), uri);
}

#[test]
fn empty_upload_is_rejected() {
    let catalog = AssetCatalog::default();
    assert!(matches!(
        catalog.register_uploaded_asset(&[]),
        Err(DesignError::InvalidAsset { .. })
    ));
}

#[test]
fn non_image_upload_is_rejected() {
    let catalog = AssetCatalog::default();
    let err = catalog
        .register_uploaded_asset(b"%PDF-1.7 definitely not a logo")
        .unwrap_err();
    assert!(matches!(err, DesignError::InvalidAsset { .. }));
}

#[test]
fn truncated_png_is_rejected() {
    let catalog = AssetCatalog::default();
    let bytes = png_bytes(16, 16);
    let err = catalog
        .register_uploaded_asset(&bytes[..bytes.len() / 2])
        .unwrap_err();
    assert!(matches!(err, DesignError::InvalidAsset { .. }));
}

#[test]
fn oversized_upload_is_rejected() {
    let bytes = png_bytes(8, 8);
    let catalog = AssetCatalog::with_limits(UploadLimits {
        max_bytes: bytes.len() - 1,
        max_dimension: 4096,
    });
    let err = catalog.register_uploaded_asset(&bytes).unwrap_err();
    assert!(err.to_string().contains("limit"));
}

#[test]
fn too_wide_upload_is_rejected() {
    let catalog = AssetCatalog::with_limits(UploadLimits {
        max_bytes: 1 << 20,
        max_dimension: 16,
    });
    assert!(catalog.register_uploaded_asset(&png_bytes(16, 16)).is_ok());
    assert!(catalog.register_uploaded_asset(&png_bytes(17, 4)).is_err());
}

#[test]
fn too_wide_upload_is_refused_from_its_header() {
    let catalog = AssetCatalog::with_limits(UploadLimits {
        max_bytes: 1 << 20,
        max_dimension: 32,
    });
    // Header intact, pixel data cut short: only the dimensions can be read.
    let bytes = png_bytes(64, 48);
    let err = catalog
        .register_uploaded_asset(&bytes[..bytes.len() - 16])
        .unwrap_err();
    assert!(err.to_string().contains("64x48"), "{err}");
}

#[test]
fn malformed_data_uris_are_rejected() {
    let catalog = AssetCatalog::default();
    for uri in [
        "image/png;base64,AAAA",
        "data:image/png;base64",
        "data:image/png,rawtext",
        "data:image/png;base64,@@@@",
    ] {
        assert!(
            matches!(
                catalog.register_uploaded_data_uri(uri),
                Err(DesignError::InvalidAsset { .. })
            ),
            "accepted {uri}"
        );
    }
}
