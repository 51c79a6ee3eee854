use axum::{
    extract::{Path, State},
    response::Response,
    routing::{get, put},
    Json, Router,
};

use crate::auth::AuthUser;
use crate::errors::ApiError;
use crate::models::Role;
use crate::services::catalog::{CreateMenuItemRequest, UpdateMenuItemRequest};
use crate::AppState;

use super::common::{created_response, no_content_response, success_response};

pub fn menu_item_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_menu_items).post(create_menu_item))
        .route("/category/:id", get(menu_items_by_category))
        .route("/:id", put(update_menu_item).delete(delete_menu_item))
}

async fn list_menu_items(State(state): State<AppState>) -> Result<Response, ApiError> {
    Ok(success_response(state.services.catalog.list_menu_items()))
}

async fn menu_items_by_category(
    State(state): State<AppState>,
    Path(category_id): Path<i64>,
) -> Result<Response, ApiError> {
    Ok(success_response(
        state.services.catalog.menu_items_by_category(category_id),
    ))
}

async fn create_menu_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<CreateMenuItemRequest>,
) -> Result<Response, ApiError> {
    auth.require_role(&[Role::Admin, Role::Manager])?;
    let item = state.services.catalog.create_menu_item(request)?;
    Ok(created_response(item))
}

async fn update_menu_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(request): Json<UpdateMenuItemRequest>,
) -> Result<Response, ApiError> {
    auth.require_role(&[Role::Admin, Role::Manager])?;
    let item = state.services.catalog.update_menu_item(id, request)?;
    Ok(success_response(item))
}

async fn delete_menu_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    auth.require_role(&[Role::Admin, Role::Manager])?;
    state.services.catalog.delete_menu_item(id)?;
    Ok(no_content_response())
}
