pub mod error;
pub mod google;
pub mod guard;
pub mod identity;
pub mod provider;
pub mod session;
pub mod session_store;

// Re-export so we can do "use crate::auth::*;"
pub use error::AuthError;
pub use google::GoogleProvider;
pub use identity::resolve_user;
pub use provider::{AuthorizationRequest, IdentityProvider, ProviderProfile};
