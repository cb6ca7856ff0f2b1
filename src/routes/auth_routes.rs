//! Sign-in, OAuth callback and sign-out handlers.

use axum::extract::{Query, State};
use axum::response::Redirect;
use axum::{routing::get, Router};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{error, info, warn};

use crate::auth::{resolve_user, session, AuthError};
use crate::models::User;
use crate::state::AppState;

/// Registers authentication routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/google", get(begin_google_login))
        .route("/auth/google/callback", get(google_callback))
        .route("/logout", get(logout))
}

/// Query parameters the provider appends when redirecting back.
#[derive(Debug, Deserialize)]
struct CallbackQuery {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

/// Sends the browser to the provider's consent page.
async fn begin_google_login(State(state): State<AppState>, session: Session) -> Redirect {
    let request = state.identity.authorization_request();
    if let Err(e) = session::begin_login(&session, &request).await {
        error!(error = %e, "Could not store OAuth state in session");
        return Redirect::to("/");
    }

    info!(provider = state.identity.get_name(), "Dispatching OAuth redirect");
    Redirect::temporary(&request.url)
}

/// Completes the sign-in. Any failure lands the browser on the home page
/// without detail.
async fn google_callback(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CallbackQuery>,
) -> Redirect {
    match complete_login(&state, &session, query).await {
        Ok(user) => {
            info!(user_id = %user.id, "User signed in");
            Redirect::to("/dashboard")
        }
        Err(e) => {
            warn!(error = %e, "Sign-in failed");
            Redirect::to("/")
        }
    }
}

async fn complete_login(
    state: &AppState,
    session: &Session,
    query: CallbackQuery,
) -> Result<User, AuthError> {
    let pending = session::take_pending_login(session)
        .await?
        .ok_or(AuthError::NoPendingLogin)?;

    if let Some(error) = query.error {
        return Err(AuthError::ProviderDenied(error));
    }
    let returned_state = query.state.ok_or(AuthError::MissingParameter("state"))?;
    if returned_state != pending.csrf_state {
        return Err(AuthError::StateMismatch);
    }
    let code = query.code.ok_or(AuthError::MissingParameter("code"))?;

    let profile = state
        .identity
        .exchange_code(&code, &pending.pkce_verifier)
        .await?;
    let user = resolve_user(state.store.as_ref(), profile).await?;
    session::login(session, &user).await?;
    Ok(user)
}

async fn logout(session: Session) -> Redirect {
    if let Err(e) = session::logout(&session).await {
        warn!(error = %e, "Failed to clear session on logout");
    }
    Redirect::to("/")
}
