pub mod asset;
pub mod garment;
pub mod placement;
pub mod region;

pub use asset::*;
pub use garment::*;
pub use placement::*;
pub use region::*;
