use axum::{extract::Query, extract::State, response::Response, routing::get, Router};

use crate::auth::AuthUser;
use crate::errors::ApiError;
use crate::models::Role;
use crate::AppState;

use super::common::{success_response, DateRangeParams};

pub fn report_routes() -> Router<AppState> {
    Router::new().route("/sales", get(sales_report))
}

async fn sales_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<DateRangeParams>,
) -> Result<Response, ApiError> {
    auth.require_role(&[Role::Admin, Role::Manager])?;
    let (start, end) = params.resolve()?;
    let report = state.services.reports.sales_report(start, end)?;
    Ok(success_response(report))
}
