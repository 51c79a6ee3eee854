use axum::{extract::State, response::Response, routing::get, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::auth::AuthUser;
use crate::errors::ApiError;
use crate::services::users::UserResponse;
use crate::AppState;

use super::common::{no_content_response, success_response};

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/user", get(current_user))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::ValidationError(e.to_string()))?;

    let user = state.auth.authenticate(&request.username, &request.password)?;
    let token = state.auth.generate_token(&user)?;
    info!(user_id = user.id, "login");
    Ok(success_response(LoginResponse {
        token,
        user: user.into(),
    }))
}

async fn logout(State(state): State<AppState>, auth: AuthUser) -> Result<Response, ApiError> {
    state.auth.revoke(&auth.token_id);
    info!(user_id = auth.user_id, "logout");
    Ok(no_content_response())
}

async fn current_user(State(state): State<AppState>, auth: AuthUser) -> Result<Response, ApiError> {
    let user = state.services.users.get(auth.user_id)?;
    Ok(success_response(user))
}
