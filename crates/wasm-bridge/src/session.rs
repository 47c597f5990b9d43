use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use decal_types::{Asset, CameraFraming, GarmentOptions, GarmentSize, Gender, RegionId, SizeTier};
use design_engine::{
    AssetCatalog, CustomizerConfig, DesignError, DesignState, RegionAvailability, RegionRegistry,
    TransformResolver,
};
use order_format::store::{self, SessionStore};
use order_format::{
    Accepted, Checkout, ContactDetails, IdentityDocument, OrderAssembler, OrderError,
    OrderRequest, PreviewImage, SessionError, ShippingAddress, SubmissionFailure,
    SubmissionResponse, SubmissionTicket,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::render::{self, CameraTransition, DecalDraw};

/// Errors from the bridge layer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BridgeError {
    #[error(transparent)]
    Design(#[from] DesignError),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("invalid {field}: {value:?}")]
    InvalidOption { field: &'static str, value: String },

    #[error("serialization error: {reason}")]
    Serialization { reason: String },

    #[error("customizer not initialized")]
    NotInitialized,
}

impl BridgeError {
    /// Stable tag sent to the UI with every error.
    pub fn kind(&self) -> &'static str {
        match self {
            BridgeError::Design(e) => e.kind(),
            BridgeError::Order(e) => e.kind(),
            BridgeError::Session(e) => e.kind(),
            BridgeError::InvalidOption { .. } => "InvalidOption",
            BridgeError::Serialization { .. } => "Serialization",
            BridgeError::NotInitialized => "NotInitialized",
        }
    }
}

/// Everything the UI renders from the design, in one serializable piece.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignView {
    pub applied_logos: BTreeMap<RegionId, Option<Asset>>,
    pub selected_region: Option<RegionId>,
    pub selected_asset: Option<Asset>,
    pub size_tier: SizeTier,
    pub garment: GarmentOptions,
    pub can_submit: bool,
    pub regions: Vec<RegionAvailability>,
    pub submitting: bool,
}

/// Checkout form contents collected by the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutForm {
    pub contact: ContactDetails,
    pub address: ShippingAddress,
    #[serde(default)]
    pub document: Option<IdentityDocument>,
    #[serde(default)]
    pub comments: Option<String>,
    /// `canvas.toDataURL("image/png")` of the 3D view.
    pub preview: String,
}

/// Request body encodings the order endpoint understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyEncoding {
    #[default]
    Json,
    Form,
}

impl BodyEncoding {
    pub fn content_type(&self) -> &'static str {
        match self {
            BodyEncoding::Json => "application/json",
            BodyEncoding::Form => "application/x-www-form-urlencoded",
        }
    }
}

/// A submission that is ready to be sent by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedSubmission {
    pub ticket: SubmissionTicket,
    pub content_type: &'static str,
    pub body: String,
    pub request: OrderRequest,
}

/// One customer's customization session.
///
/// Owns the design, the catalogs and the checkout, and mirrors the design
/// into the session store after every change.
pub struct CustomizerSession {
    config: CustomizerConfig,
    registry: Arc<RegionRegistry>,
    catalog: AssetCatalog,
    resolver: TransformResolver,
    state: DesignState,
    checkout: Checkout,
    uploaded: Option<Asset>,
    camera: CameraFraming,
    store: Box<dyn SessionStore>,
}

impl CustomizerSession {
    pub fn new(config: CustomizerConfig, store: Box<dyn SessionStore>) -> Self {
        Self::with_registry(config, RegionRegistry::garment_default(), store)
    }

    pub fn with_registry(
        config: CustomizerConfig,
        registry: RegionRegistry,
        store: Box<dyn SessionStore>,
    ) -> Self {
        let registry = Arc::new(registry);
        let resolver = TransformResolver::new(&registry, config.tier_scales);
        let catalog = AssetCatalog::with_limits(config.upload_limits());
        let checkout = Checkout::with_timeout_secs(config.submission_timeout_secs);
        Self {
            state: DesignState::new(registry.clone()),
            registry,
            catalog,
            resolver,
            checkout,
            uploaded: None,
            camera: CameraFraming::default(),
            config,
            store,
        }
    }

    pub fn config(&self) -> &CustomizerConfig {
        &self.config
    }

    pub fn registry(&self) -> &RegionRegistry {
        &self.registry
    }

    pub fn catalog(&self) -> &AssetCatalog {
        &self.catalog
    }

    pub fn state(&self) -> &DesignState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut DesignState {
        &mut self.state
    }

    pub fn checkout(&self) -> &Checkout {
        &self.checkout
    }

    pub fn camera(&self) -> CameraFraming {
        self.camera
    }

    /// The last uploaded asset, if any.
    pub fn uploaded_asset(&self) -> Option<&Asset> {
        self.uploaded.as_ref()
    }

    /// Presets followed by the uploaded asset.
    pub fn assets(&self) -> Vec<Asset> {
        let mut assets = self.catalog.list_preset_assets().to_vec();
        assets.extend(self.uploaded.clone());
        assets
    }

    // ── Design ──────────────────────────────────────────────────────

    /// Select a region and return the camera move that frames it.
    pub fn select_region(&mut self, id: &str) -> Result<CameraTransition, BridgeError> {
        self.ensure_editable()?;
        let target = self.registry.get_region(id)?.camera;
        self.state.select_region(id)?;
        let transition =
            CameraTransition::new(self.camera, target, self.config.camera_transition_ms);
        self.camera = target;
        self.persist();
        Ok(transition)
    }

    /// Stage a preset, or the uploaded asset for id `custom`.
    pub fn select_asset(&mut self, id: &str) -> Result<(), BridgeError> {
        self.ensure_editable()?;
        let asset = match &self.uploaded {
            Some(uploaded) if uploaded.id.as_str() == id => uploaded.clone(),
            _ => self.catalog.get_preset(id)?.clone(),
        };
        self.state.select_asset(asset);
        Ok(())
    }

    /// Validate an uploaded image and stage it.
    #[instrument(skip(self, data_uri), fields(len = data_uri.len()))]
    pub fn upload_asset(&mut self, data_uri: &str) -> Result<Asset, BridgeError> {
        self.ensure_editable()?;
        let asset = self.catalog.register_uploaded_data_uri(data_uri)?;
        self.uploaded = Some(asset.clone());
        self.state.select_asset(asset.clone());
        Ok(asset)
    }

    pub fn clear_staged(&mut self) -> Result<(), BridgeError> {
        self.ensure_editable()?;
        self.state.clear_staged();
        Ok(())
    }

    pub fn apply_staged(&mut self) -> Result<RegionId, BridgeError> {
        self.ensure_editable()?;
        let region = self.state.apply_staged()?;
        self.persist();
        Ok(region)
    }

    pub fn remove_applied(&mut self, region: &str) -> Result<bool, BridgeError> {
        self.ensure_editable()?;
        let removed = self.state.remove_applied(region)?;
        if removed {
            self.persist();
        }
        Ok(removed)
    }

    pub fn set_size_tier(&mut self, name: &str) -> Result<SizeTier, BridgeError> {
        self.ensure_editable()?;
        let tier = self.state.set_size_tier_named(name)?;
        self.persist();
        Ok(tier)
    }

    pub fn set_garment_size(&mut self, name: &str) -> Result<GarmentSize, BridgeError> {
        self.ensure_editable()?;
        let size = GarmentSize::from_name(name).ok_or_else(|| BridgeError::InvalidOption {
            field: "garment size",
            value: name.to_string(),
        })?;
        self.state.set_garment_size(size);
        self.persist();
        Ok(size)
    }

    pub fn set_gender(&mut self, name: &str) -> Result<Gender, BridgeError> {
        self.ensure_editable()?;
        let gender = Gender::from_name(name).ok_or_else(|| BridgeError::InvalidOption {
            field: "gender",
            value: name.to_string(),
        })?;
        self.state.set_gender(gender);
        self.persist();
        Ok(gender)
    }

    pub fn view(&self) -> DesignView {
        DesignView {
            applied_logos: self.state.applied_logos().clone(),
            selected_region: self.state.selected_region().cloned(),
            selected_asset: self.state.selected_asset().cloned(),
            size_tier: self.state.size_tier(),
            garment: self.state.garment(),
            can_submit: self.state.can_submit(),
            regions: self.state.region_availability(),
            submitting: self.checkout.is_in_flight(),
        }
    }

    pub fn decals(&self) -> Result<Vec<DecalDraw>, BridgeError> {
        Ok(render::draw_list(&self.state.snapshot(), &self.resolver)?)
    }

    // ── Persistence ─────────────────────────────────────────────────

    /// Write the design to the store now. Returns the persisted JSON.
    pub fn save_session(&mut self) -> Result<String, BridgeError> {
        let json = order_format::save_session(&self.state.snapshot())?;
        self.store
            .save(&self.config.storage_key, &json)
            .map_err(SessionError::from)?;
        Ok(json)
    }

    /// Rehydrate the design from the store. Returns false when nothing was stored.
    pub fn restore_session(&mut self) -> Result<bool, BridgeError> {
        self.ensure_editable()?;
        let restored =
            store::restore_design(self.store.as_ref(), &self.config.storage_key, &mut self.state)?;
        if let Some(region) = self.state.selected_region() {
            if let Ok(framing) = self.registry.get_region(region.as_str()) {
                self.camera = framing.camera;
            }
        }
        Ok(restored)
    }

    /// Design changes are refused while an order is in flight.
    fn ensure_editable(&self) -> Result<(), BridgeError> {
        if self.checkout.is_in_flight() {
            warn!("design change refused while the order is in flight");
            return Err(OrderError::SubmissionInFlight.into());
        }
        Ok(())
    }

    fn persist(&mut self) {
        let snapshot = self.state.snapshot();
        match store::persist_design(self.store.as_mut(), &self.config.storage_key, &snapshot) {
            Ok(()) => debug!(logos = snapshot.logo_count(), "design persisted"),
            Err(e) => warn!(error = %e, "could not persist design"),
        }
    }

    // ── Checkout ────────────────────────────────────────────────────

    /// Assemble the order and start a submission.
    ///
    /// Nothing changes when the design is empty, the preview is invalid or a
    /// submission is already in flight.
    #[instrument(skip(self, form))]
    pub fn begin_checkout(
        &mut self,
        form: CheckoutForm,
        encoding: BodyEncoding,
        now: DateTime<Utc>,
    ) -> Result<PreparedSubmission, BridgeError> {
        if self.checkout.is_in_flight() {
            return Err(OrderError::SubmissionInFlight.into());
        }
        let preview = PreviewImage::from_data_url(&form.preview)?;
        let payload = OrderAssembler::new(&self.registry, &self.resolver)
            .assemble(&self.state.snapshot(), preview)?;
        let request = OrderRequest {
            contact: form.contact,
            address: form.address,
            document: form.document,
            comments: form.comments,
            payload,
        };
        let body = match encoding {
            BodyEncoding::Json => request.to_json_body()?,
            BodyEncoding::Form => request.to_form_body()?,
        };
        let ticket = self.checkout.begin(now)?;
        info!(ticket = ticket.0, bytes = body.len(), "order ready to send");
        Ok(PreparedSubmission {
            ticket,
            content_type: encoding.content_type(),
            body,
            request,
        })
    }

    /// Record the endpoint's response for `ticket`.
    pub fn complete_submission(
        &mut self,
        ticket: SubmissionTicket,
        response: &SubmissionResponse,
    ) -> Result<Accepted, BridgeError> {
        let accepted = self.checkout.complete(
            ticket,
            response,
            &mut self.state,
            self.store.as_mut(),
            &self.config.storage_key,
        )?;
        self.uploaded = None;
        self.camera = CameraFraming::default();
        Ok(accepted)
    }

    /// Record a transport failure for `ticket`.
    pub fn submission_errored(&mut self, ticket: SubmissionTicket, reason: &str) -> BridgeError {
        self.checkout.fail(ticket, reason).into()
    }

    /// Expire the in-flight submission if its deadline has passed.
    pub fn check_timeout(&mut self, now: DateTime<Utc>) -> Option<SubmissionFailure> {
        self.checkout.poll_timeout(now)
    }
}
