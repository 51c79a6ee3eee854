use axum::{
    extract::{Path, Query, State},
    response::Response,
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::errors::ApiError;
use crate::models::Role;
use crate::services::inventory::{CreateInventoryItemRequest, UpdateInventoryItemRequest};
use crate::AppState;

use super::common::{created_response, no_content_response, success_response, MutationResponse};

#[derive(Debug, Deserialize)]
struct SearchParams {
    q: String,
}

pub fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_inventory).post(create_inventory_item))
        .route("/search", get(search_inventory))
        .route("/low-stock", get(low_stock))
        .route("/:id", put(update_inventory_item).delete(delete_inventory_item))
}

async fn list_inventory(State(state): State<AppState>, _auth: AuthUser) -> Result<Response, ApiError> {
    Ok(success_response(state.services.inventory.list()))
}

async fn search_inventory(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<SearchParams>,
) -> Result<Response, ApiError> {
    Ok(success_response(state.services.inventory.search(&params.q)))
}

async fn low_stock(State(state): State<AppState>, _auth: AuthUser) -> Result<Response, ApiError> {
    Ok(success_response(state.services.inventory.low_stock()))
}

async fn create_inventory_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<CreateInventoryItemRequest>,
) -> Result<Response, ApiError> {
    auth.require_role(&[Role::Admin, Role::Manager])?;
    let created = state
        .services
        .inventory
        .create(request, Some(auth.user_id))?;
    Ok(created_response(MutationResponse::from(created)))
}

async fn update_inventory_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(request): Json<UpdateInventoryItemRequest>,
) -> Result<Response, ApiError> {
    auth.require_role(&[Role::Admin, Role::Manager])?;
    let updated = state
        .services
        .inventory
        .update(id, request, Some(auth.user_id))?;
    Ok(success_response(MutationResponse::from(updated)))
}

async fn delete_inventory_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    auth.require_role(&[Role::Admin, Role::Manager])?;
    state.services.inventory.delete(id)?;
    Ok(no_content_response())
}
