//! Shared application state.
//!
//! Contains the state that is shared across all request handlers: the
//! configuration, the persistence gateway and the identity provider.

use crate::auth::IdentityProvider;
use crate::config::ConfigV1;
use crate::store::Store;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// Cloned for each request; every field is a cheap `Arc` handle.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded at startup.
    pub config: Arc<ConfigV1>,
    /// Access to the `users` and `items` collections.
    pub store: Arc<dyn Store>,
    /// External OAuth2 identity provider used for sign-in.
    pub identity: Arc<dyn IdentityProvider>,
}
