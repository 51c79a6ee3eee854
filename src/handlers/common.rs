use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{ApiError, ServiceError};
use crate::services::effects::{EffectWarning, Mutated};

/// Standard success response
pub fn success_response<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(data)).into_response()
}

/// Standard created response
pub fn created_response<T: Serialize>(data: T) -> Response {
    (StatusCode::CREATED, Json(data)).into_response()
}

/// Standard no content response
pub fn no_content_response() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

/// Mutation result payload: the entity itself, with a `warnings` array
/// attached when side effects could not be applied.
#[derive(Debug, Serialize)]
pub struct MutationResponse<T: Serialize> {
    #[serde(flatten)]
    pub data: T,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<EffectWarning>,
}

impl<T: Serialize> From<Mutated<T>> for MutationResponse<T> {
    fn from(mutated: Mutated<T>) -> Self {
        Self {
            data: mutated.value,
            warnings: mutated.warnings,
        }
    }
}

/// Date-range query for report and export endpoints. Accepts a bare ISO date
/// or a full RFC 3339 timestamp.
#[derive(Debug, Deserialize)]
pub struct DateRangeParams {
    pub start_date: String,
    pub end_date: String,
}

impl DateRangeParams {
    pub fn resolve(&self) -> Result<(DateTime<Utc>, DateTime<Utc>), ApiError> {
        let start = parse_date_param(&self.start_date, false)?;
        let end = parse_date_param(&self.end_date, true)?;
        Ok((start, end))
    }
}

fn parse_date_param(value: &str, end_of_day: bool) -> Result<DateTime<Utc>, ApiError> {
    if let Ok(timestamp) = value.parse::<DateTime<Utc>>() {
        return Ok(timestamp);
    }
    let date: NaiveDate = value.parse().map_err(|_| {
        ApiError::ServiceError(ServiceError::ValidationError(format!(
            "Invalid date '{}': expected YYYY-MM-DD or an RFC 3339 timestamp",
            value
        )))
    })?;
    let time = if end_of_day {
        date.and_hms_opt(23, 59, 59).unwrap_or_default()
    } else {
        date.and_hms_opt(0, 0, 0).unwrap_or_default()
    };
    Ok(DateTime::from_naive_utc_and_offset(time, Utc))
}
