use axum::{
    extract::{Path, State},
    response::Response,
    routing::{get, post},
    Json, Router,
};

use crate::auth::AuthUser;
use crate::errors::{ApiError, ServiceError};
use crate::services::shifts::ClockInRequest;
use crate::AppState;

use super::common::{created_response, success_response};

pub fn shift_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_shifts))
        .route("/user/:id", get(shifts_for_user))
        .route("/clock-in", post(clock_in))
        .route("/clock-out/:id", post(clock_out))
}

async fn list_shifts(State(state): State<AppState>, auth: AuthUser) -> Result<Response, ApiError> {
    // Staff see their own shifts; managers see everyone's.
    let shifts = if auth.role.is_managerial() {
        state.services.shifts.list()
    } else {
        state.services.shifts.for_user(auth.user_id)
    };
    Ok(success_response(shifts))
}

async fn shifts_for_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<i64>,
) -> Result<Response, ApiError> {
    if !auth.can_act_for(user_id) {
        return Err(ServiceError::Forbidden(
            "Cannot view another user's shifts".to_string(),
        )
        .into());
    }
    Ok(success_response(state.services.shifts.for_user(user_id)))
}

async fn clock_in(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<ClockInRequest>,
) -> Result<Response, ApiError> {
    let shift = state.services.shifts.clock_in(&auth, request)?;
    Ok(created_response(shift))
}

async fn clock_out(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let shift = state.services.shifts.clock_out(&auth, id)?;
    Ok(success_response(shift))
}
