pub mod rig;
pub mod secondary;
pub mod render;
pub mod scenario;
pub mod export;

pub use secondary::{JiggleBone, JiggleParams, JiggleState, JiggleStep};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
