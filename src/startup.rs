//! Application startup and server initialization.
//!
//! This module handles the creation and configuration of the HTTP server,
//! including the persistence gateway, the identity provider and route setup,
//! and closes the database connection once the server has drained.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::auth::{GoogleProvider, IdentityProvider};
use crate::config::ConfigV1;
use crate::routes;
use crate::state::AppState;
use crate::store::create_store;

/// Initializes and runs the application server.
///
/// # Errors
///
/// Returns an error if the store cannot be reached, the OAuth configuration
/// is invalid, or the server fails to bind to the configured address.
pub async fn run(config: Arc<ConfigV1>) -> Result<(), Box<dyn std::error::Error>> {
    let store = create_store(&config.store).await?;
    let identity: Arc<dyn IdentityProvider> = Arc::new(GoogleProvider::new(&config.oauth)?);

    let state = AppState {
        config: config.clone(),
        store: store.clone(),
        identity,
    };
    let app = routes::create_router(state);

    let listener = TcpListener::bind(&config.bind_address).await?;
    info!("Server running on {}", config.bind_address);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    // Best effort: close the connection whether or not serving failed.
    store.shutdown().await;
    served?;
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received, draining connections");
}
