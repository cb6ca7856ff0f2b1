// This module re-exports important pieces for convenience,
// so we can "use crate::config::*" easily.
pub mod logging;
pub mod oauth;
pub mod session;
pub mod store;
pub mod types;

pub use logging::*;
pub use oauth::*;
pub use session::*;
pub use store::*;
pub use types::*;
