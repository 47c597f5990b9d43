pub mod catalog;
pub mod config;
pub mod events;
pub mod registry;
pub mod resolve;
pub mod snapshot;
pub mod state;
pub mod types;

pub use catalog::AssetCatalog;
pub use config::{CustomizerConfig, TierScales, UploadLimits};
pub use events::{DesignEvent, SubscriptionId};
pub use registry::RegionRegistry;
pub use resolve::TransformResolver;
pub use snapshot::DesignSnapshot;
pub use state::{DesignState, RegionAvailability};
pub use types::DesignError;
