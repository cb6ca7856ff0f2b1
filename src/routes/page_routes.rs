//! Home, dashboard and profile pages.

use axum::extract::State;
use axum::{routing::get, Json, Router};

use crate::models::User;
use crate::state::AppState;
use crate::utils::http_helpers::{map_store_error, HTTPError};
use crate::views::{DashboardView, HomeView, ProfileView};

/// Registers page routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/dashboard", get(dashboard))
        .route("/profile", get(profile))
}

async fn home(user: Option<User>) -> Json<HomeView> {
    Json(HomeView {
        user: user.as_ref().map(Into::into),
    })
}

/// Lists the signed-in user's items.
async fn dashboard(
    State(state): State<AppState>,
    user: User,
) -> Result<Json<DashboardView>, HTTPError> {
    let items = state
        .store
        .list_items(&user.id)
        .await
        .map_err(map_store_error("Error loading dashboard"))?;
    Ok(Json(DashboardView::new(&user, &items)))
}

async fn profile(user: User) -> Json<ProfileView> {
    Json(ProfileView {
        user: (&user).into(),
    })
}
