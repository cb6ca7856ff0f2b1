//! Request gate for authenticated routes.
//!
//! Taking `User` as a handler argument requires a signed-in session and
//! redirects to the home page otherwise. `Option<User>` never rejects.

use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use tower_sessions::Session;
use tracing::{debug, error};

use super::session::current_user;
use crate::models::User;
use crate::state::AppState;
use crate::utils::http_helpers::HTTPError;

async fn session_user(parts: &Parts, state: &AppState) -> Result<Option<User>, HTTPError> {
    let session = parts.extensions.get::<Session>().cloned().ok_or_else(|| {
        error!("Session layer is not installed on this route");
        HTTPError::new(StatusCode::INTERNAL_SERVER_ERROR, "Session unavailable")
    })?;
    Ok(current_user(&session, state.store.as_ref()).await)
}

impl FromRequestParts<AppState> for User {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Response> {
        match session_user(parts, state).await {
            Ok(Some(user)) => Ok(user),
            Ok(None) => {
                debug!(path = %parts.uri.path(), "Unauthenticated request, redirecting home");
                Err(Redirect::to("/").into_response())
            }
            Err(e) => Err(e.into_response()),
        }
    }
}

impl OptionalFromRequestParts<AppState> for User {
    type Rejection = HTTPError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, HTTPError> {
        session_user(parts, state).await
    }
}
