use axum::{
    extract::{Path, State},
    response::Response,
    routing::{post, put},
    Json, Router,
};

use crate::auth::AuthUser;
use crate::errors::ApiError;
use crate::services::orders::{CreateOrderItemRequest, UpdateOrderItemRequest};
use crate::AppState;

use super::common::{created_response, no_content_response, success_response, MutationResponse};

pub fn order_item_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_order_item))
        .route("/:id", put(update_order_item).delete(delete_order_item))
}

async fn create_order_item(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(request): Json<CreateOrderItemRequest>,
) -> Result<Response, ApiError> {
    let created = state.services.orders.create_item(request)?;
    Ok(created_response(MutationResponse::from(created)))
}

async fn update_order_item(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
    Json(request): Json<UpdateOrderItemRequest>,
) -> Result<Response, ApiError> {
    let updated = state.services.orders.update_item(id, request)?;
    Ok(success_response(MutationResponse::from(updated)))
}

async fn delete_order_item(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let result = state.services.orders.delete_item(id)?;
    if result.warnings.is_empty() {
        Ok(no_content_response())
    } else {
        Ok(success_response(MutationResponse::from(result)))
    }
}
