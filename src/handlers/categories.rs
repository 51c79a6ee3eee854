use axum::{
    extract::{Path, State},
    response::Response,
    routing::{get, put},
    Json, Router,
};

use crate::auth::AuthUser;
use crate::errors::ApiError;
use crate::models::Role;
use crate::services::catalog::{CreateCategoryRequest, UpdateCategoryRequest};
use crate::AppState;

use super::common::{created_response, no_content_response, success_response};

pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route("/:id", put(update_category).delete(delete_category))
}

async fn list_categories(State(state): State<AppState>) -> Result<Response, ApiError> {
    Ok(success_response(state.services.catalog.list_categories()))
}

async fn create_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<CreateCategoryRequest>,
) -> Result<Response, ApiError> {
    auth.require_role(&[Role::Admin, Role::Manager])?;
    let category = state.services.catalog.create_category(request)?;
    Ok(created_response(category))
}

async fn update_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(request): Json<UpdateCategoryRequest>,
) -> Result<Response, ApiError> {
    auth.require_role(&[Role::Admin, Role::Manager])?;
    let category = state.services.catalog.update_category(id, request)?;
    Ok(success_response(category))
}

async fn delete_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    auth.require_role(&[Role::Admin, Role::Manager])?;
    state.services.catalog.delete_category(id)?;
    Ok(no_content_response())
}
