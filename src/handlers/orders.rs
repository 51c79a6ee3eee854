use axum::{
    extract::{Path, State},
    response::Response,
    routing::get,
    Json, Router,
};

use crate::auth::AuthUser;
use crate::errors::ApiError;
use crate::services::orders::{CreateOrderRequest, UpdateOrderRequest};
use crate::AppState;

use super::common::{created_response, success_response, MutationResponse};

pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route("/active", get(active_orders))
        .route("/:id", get(get_order).put(update_order))
}

async fn list_orders(State(state): State<AppState>, _auth: AuthUser) -> Result<Response, ApiError> {
    Ok(success_response(state.services.orders.list()))
}

async fn active_orders(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Response, ApiError> {
    Ok(success_response(state.services.orders.active()))
}

async fn get_order(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    Ok(success_response(state.services.orders.get(id)?))
}

async fn create_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<CreateOrderRequest>,
) -> Result<Response, ApiError> {
    let created = state.services.orders.create(request, Some(auth.user_id))?;
    Ok(created_response(MutationResponse::from(created)))
}

async fn update_order(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
    Json(request): Json<UpdateOrderRequest>,
) -> Result<Response, ApiError> {
    let order = state.services.orders.update(id, request)?;
    Ok(success_response(order))
}
