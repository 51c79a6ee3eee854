use axum::{
    extract::{Path, State},
    response::Response,
    routing::{get, put},
    Json, Router,
};

use crate::auth::AuthUser;
use crate::errors::ApiError;
use crate::models::Role;
use crate::services::tables::{CreateTableRequest, UpdateTableRequest};
use crate::AppState;

use super::common::{created_response, no_content_response, success_response};

pub fn table_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tables).post(create_table))
        .route("/:id", put(update_table).delete(delete_table))
}

async fn list_tables(State(state): State<AppState>) -> Result<Response, ApiError> {
    Ok(success_response(state.services.tables.list()))
}

async fn create_table(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<CreateTableRequest>,
) -> Result<Response, ApiError> {
    auth.require_role(&[Role::Admin, Role::Manager])?;
    let table = state.services.tables.create(request)?;
    Ok(created_response(table))
}

async fn update_table(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(request): Json<UpdateTableRequest>,
) -> Result<Response, ApiError> {
    auth.require_role(&[Role::Admin, Role::Manager])?;
    let table = state.services.tables.update(id, request)?;
    Ok(success_response(table))
}

async fn delete_table(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    auth.require_role(&[Role::Admin, Role::Manager])?;
    state.services.tables.delete(id)?;
    Ok(no_content_response())
}
