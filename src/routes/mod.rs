//! HTTP route definitions and handlers.
//!
//! This module organizes all HTTP endpoints into logical groups:
//! sign-in/out, pages, item management and health checks.

mod auth_routes;
mod health_routes;
mod item_routes;
mod page_routes;

use crate::auth::session::session_layer;
use crate::state::AppState;
use axum::Router;

/// Creates the application router with all configured routes.
///
/// Combines all route modules into a single router, attaches the
/// application state and wraps everything in the session layer.
pub fn create_router(state: AppState) -> Router {
    let sessions = session_layer(&state.config.session);

    Router::new()
        .merge(page_routes::routes())
        .merge(auth_routes::routes())
        .merge(item_routes::routes())
        .merge(health_routes::routes())
        .with_state(state)
        .layer(sessions)
}
