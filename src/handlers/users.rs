use axum::{
    extract::{Path, State},
    response::Response,
    routing::{get, put},
    Json, Router,
};

use crate::auth::AuthUser;
use crate::errors::ApiError;
use crate::models::Role;
use crate::services::users::{CreateUserRequest, UpdateUserRequest};
use crate::AppState;

use super::common::{created_response, success_response};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", put(update_user))
}

async fn list_users(State(state): State<AppState>, auth: AuthUser) -> Result<Response, ApiError> {
    auth.require_role(&[Role::Admin])?;
    Ok(success_response(state.services.users.list()))
}

async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<CreateUserRequest>,
) -> Result<Response, ApiError> {
    auth.require_role(&[Role::Admin])?;
    let user = state.services.users.create(request)?;
    Ok(created_response(user))
}

async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Response, ApiError> {
    auth.require_role(&[Role::Admin])?;
    let user = state.services.users.update(id, request)?;
    Ok(success_response(user))
}
