pub mod assemble;
pub mod checkout;
pub mod errors;
pub mod migrate;
pub mod preview;
pub mod request;
pub mod session;
pub mod store;

pub use assemble::{AppliedLogo, OrderAssembler, OrderDesign, OrderPayload, OrderSummary};
pub use checkout::{Checkout, SubmissionPhase, SubmissionTicket};
pub use errors::{FieldMessage, OrderError, SessionError, StoreError, SubmissionFailure};
pub use preview::PreviewImage;
pub use request::{
    Accepted, ContactDetails, DocumentKind, IdentityDocument, OrderRequest, ShippingAddress,
    StreetType, SubmissionResponse,
};
pub use session::{load_session, save_session, FORMAT_NAME, FORMAT_VERSION};
pub use store::{MemoryStore, SessionStore};
