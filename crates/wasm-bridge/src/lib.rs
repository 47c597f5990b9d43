pub mod dispatch;
pub mod messages;
pub mod render;
pub mod session;

#[cfg(target_arch = "wasm32")]
pub mod wasm_api;

pub use dispatch::dispatch;
pub use render::{draw_list, CameraTransition, DecalDraw};
pub use session::{
    BodyEncoding, BridgeError, CheckoutForm, CustomizerSession, DesignView, PreparedSubmission,
};
