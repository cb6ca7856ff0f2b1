//! Server-side session handling.
//!
//! Sessions live in a bounded `tower-sessions` store and are keyed by a
//! random id carried in a cookie. Only the user's internal id is kept in
//! the session; the full user is reloaded from the store on every request.

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use tower_sessions::cookie::time::Duration;
use tower_sessions::cookie::SameSite;
use tower_sessions::{Expiry, Session, SessionManagerLayer};
use tracing::{debug, error, warn};

use super::session_store::SessionCache;
use super::{AuthError, AuthorizationRequest};
use crate::config::SessionConfig;
use crate::models::User;
use crate::store::Store;

/// Key under which the signed-in user's id (hex) is stored.
pub const SESSION_USER_ID_KEY: &str = "user_id";
/// Key for the OAuth secrets kept between the redirect and the callback.
const PENDING_LOGIN_KEY: &str = "oauth_pending";

/// CSRF state and PKCE verifier for a sign-in that is in flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingLogin {
    pub csrf_state: String,
    pub pkce_verifier: String,
}

/// Build the session middleware.
///
/// `SameSite=Lax` is required: the provider's redirect back to the callback
/// is a cross-site navigation and must still carry the cookie.
pub fn session_layer(config: &SessionConfig) -> SessionManagerLayer<SessionCache> {
    let idle_timeout = config.inactivity_timeout_secs.get();
    let store = SessionCache::new(
        config.max_sessions,
        std::time::Duration::from_secs(u64::from(idle_timeout)),
    );

    SessionManagerLayer::new(store)
        .with_name(config.cookie_name.clone())
        .with_secure(config.secure)
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(Duration::seconds(i64::from(
            idle_timeout,
        ))))
}

/// Remember the secrets of a sign-in we are about to redirect for.
pub async fn begin_login(
    session: &Session,
    request: &AuthorizationRequest,
) -> Result<(), AuthError> {
    let pending = PendingLogin {
        csrf_state: request.csrf_state.clone(),
        pkce_verifier: request.pkce_verifier.clone(),
    };
    session.insert(PENDING_LOGIN_KEY, pending).await?;
    Ok(())
}

/// Read and forget the in-flight sign-in, so a callback can only be used once.
pub async fn take_pending_login(session: &Session) -> Result<Option<PendingLogin>, AuthError> {
    Ok(session.remove::<PendingLogin>(PENDING_LOGIN_KEY).await?)
}

/// Establish an authenticated session for `user`.
///
/// The session id is cycled so an id planted before sign-in is never
/// promoted to an authenticated one.
pub async fn login(session: &Session, user: &User) -> Result<(), AuthError> {
    session.cycle_id().await?;
    session
        .insert(SESSION_USER_ID_KEY, user.id.to_hex())
        .await?;
    debug!(user_id = %user.id, "Session established");
    Ok(())
}

/// Resolve the session's user. Every failure along the way means "nobody is
/// signed in" rather than an error.
pub async fn current_user(session: &Session, store: &dyn Store) -> Option<User> {
    let user_id = match session.get::<String>(SESSION_USER_ID_KEY).await {
        Ok(Some(user_id)) => user_id,
        Ok(None) => return None,
        Err(e) => {
            warn!(error = %e, "Failed to read session");
            return None;
        }
    };

    let user_id = match ObjectId::parse_str(&user_id) {
        Ok(id) => id,
        Err(e) => {
            warn!(error = %e, "Session holds a malformed user id");
            return None;
        }
    };

    match store.get_user(&user_id).await {
        Ok(Some(user)) => Some(user),
        Ok(None) => {
            debug!(user_id = %user_id, "Session refers to an unknown user");
            None
        }
        Err(e) => {
            error!(error = %e, user_id = %user_id, "Failed to load session user");
            None
        }
    }
}

/// Destroy the session and its data.
pub async fn logout(session: &Session) -> Result<(), AuthError> {
    session.flush().await?;
    Ok(())
}
