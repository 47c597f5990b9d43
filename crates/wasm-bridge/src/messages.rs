use decal_types::{Asset, Region};
use order_format::SubmissionResponse;
use serde::{Deserialize, Serialize};

use crate::render::{CameraTransition, DecalDraw};
use crate::session::{BodyEncoding, CheckoutForm, DesignView};

/// Messages from the UI (page script) to the customizer.
/// Serialized as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UiToEngine {
    // -- Catalogs --
    ListRegions,
    ListAssets,

    // -- Design --
    SelectRegion {
        region: String,
    },
    /// Stage a preset, or the uploaded asset (`custom`).
    SelectAsset {
        asset_id: String,
    },
    /// `FileReader.readAsDataURL` result of the chosen file.
    UploadAsset {
        data_uri: String,
    },
    ClearStaged,
    ApplyStaged,
    RemoveApplied {
        region: String,
    },
    SetSizeTier {
        tier: String,
    },
    SetGarmentSize {
        size: String,
    },
    SetGender {
        gender: String,
    },
    GetState,

    // -- Session --
    SaveSession,
    RestoreSession,

    // -- Checkout --
    BeginCheckout {
        form: CheckoutForm,
        #[serde(default)]
        encoding: BodyEncoding,
    },
    SubmissionCompleted {
        ticket: u64,
        response: SubmissionResponse,
    },
    /// The request never got a response.
    SubmissionErrored {
        ticket: u64,
        reason: String,
    },
    CheckTimeout,
}

/// Messages from the customizer back to the UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EngineToUi {
    Catalog {
        regions: Vec<Region>,
        assets: Vec<Asset>,
    },

    /// The design changed (or was asked for).
    StateChanged {
        view: DesignView,
        decals: Vec<DecalDraw>,
    },

    /// A region was selected; animate the camera towards it.
    CameraMove {
        transition: CameraTransition,
        view: DesignView,
    },

    SessionSaved {
        data: String,
    },

    SessionRestored {
        restored: bool,
        view: DesignView,
        decals: Vec<DecalDraw>,
    },

    /// The order body is ready; the host sends it and reports back.
    SubmitReady {
        ticket: u64,
        content_type: String,
        body: String,
    },

    OrderAccepted {
        redirect: String,
    },

    Error {
        kind: String,
        message: String,
    },
}
