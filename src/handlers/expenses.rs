use axum::{
    extract::{Path, State},
    response::Response,
    routing::get,
    Json, Router,
};

use crate::auth::AuthUser;
use crate::errors::ApiError;
use crate::models::Role;
use crate::services::expenses::{CreateExpenseRequest, UpdateExpenseRequest};
use crate::AppState;

use super::common::{created_response, no_content_response, success_response};

pub fn expense_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_expenses).post(create_expense))
        .route("/:id", get(get_expense).put(update_expense).delete(delete_expense))
}

async fn list_expenses(State(state): State<AppState>, _auth: AuthUser) -> Result<Response, ApiError> {
    Ok(success_response(state.services.expenses.list()))
}

async fn get_expense(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    Ok(success_response(state.services.expenses.get(id)?))
}

async fn create_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<CreateExpenseRequest>,
) -> Result<Response, ApiError> {
    auth.require_role(&[Role::Admin, Role::Manager])?;
    let expense = state
        .services
        .expenses
        .create(request, Some(auth.user_id))?;
    Ok(created_response(expense))
}

async fn update_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(request): Json<UpdateExpenseRequest>,
) -> Result<Response, ApiError> {
    auth.require_role(&[Role::Admin, Role::Manager])?;
    let expense = state.services.expenses.update(id, request)?;
    Ok(success_response(expense))
}

async fn delete_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    auth.require_role(&[Role::Admin, Role::Manager])?;
    state.services.expenses.delete(id)?;
    Ok(no_content_response())
}
