//! Item endpoint handlers. Every store call is scoped to the signed-in user.

use axum::extract::{FromRequest, Path, Request, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use mongodb::bson::oid::ObjectId;
use tracing::{debug, info};

use crate::models::{NewItem, User};
use crate::state::AppState;
use crate::utils::http_helpers::{map_store_error, HTTPError};
use crate::views::ItemPageView;

/// Registers item routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/items", post(create_item))
        .route("/items/{id}", get(show_item).delete(delete_item))
}

/// Body of `POST /items`, accepted as JSON or as an urlencoded form.
#[derive(Debug)]
struct ItemPayload(NewItem);

impl<S> FromRequest<S> for ItemPayload
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|content_type| content_type.starts_with("application/json"));

        if is_json {
            let Json(new_item) = Json::<NewItem>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(ItemPayload(new_item))
        } else {
            let Form(new_item) = Form::<NewItem>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(ItemPayload(new_item))
        }
    }
}

/// A path id that is not an ObjectId cannot name any stored item.
fn parse_item_id(id: &str) -> Result<ObjectId, HTTPError> {
    ObjectId::parse_str(id).map_err(|_| {
        debug!("Rejecting malformed item id '{}'", id);
        HTTPError::not_found()
    })
}

async fn create_item(
    State(state): State<AppState>,
    user: User,
    ItemPayload(new_item): ItemPayload,
) -> Result<Redirect, HTTPError> {
    let item = state
        .store
        .insert_item(new_item, &user.id)
        .await
        .map_err(map_store_error("Error creating item"))?;
    info!(item_id = %item.id, user_id = %user.id, "Item created");
    Ok(Redirect::to("/dashboard"))
}

async fn show_item(
    State(state): State<AppState>,
    user: User,
    Path(id): Path<String>,
) -> Result<Json<ItemPageView>, HTTPError> {
    let id = parse_item_id(&id)?;
    let item = state
        .store
        .find_item(&id, &user.id)
        .await
        .map_err(map_store_error("Error loading item"))?
        .ok_or_else(HTTPError::not_found)?;

    Ok(Json(ItemPageView {
        user: (&user).into(),
        item: (&item).into(),
    }))
}

async fn delete_item(
    State(state): State<AppState>,
    user: User,
    Path(id): Path<String>,
) -> Result<StatusCode, HTTPError> {
    let id = parse_item_id(&id)?;
    let deleted = state
        .store
        .delete_item(&id, &user.id)
        .await
        .map_err(map_store_error("Error deleting item"))?;

    if !deleted {
        return Err(HTTPError::not_found());
    }
    info!(item_id = %id, user_id = %user.id, "Item deleted");
    Ok(StatusCode::OK)
}
