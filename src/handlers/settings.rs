use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::auth::AuthUser;
use crate::backup::{
    create_backup, export_csv, parse_text, restore_snapshot, serialize_to_text, BackupSnapshot,
    ExportKind, RestoreSummary, SkippedRow,
};
use crate::errors::ApiError;
use crate::models::Role;
use crate::services::settings::UpsertSettingRequest;
use crate::AppState;

use super::common::{no_content_response, success_response};

#[derive(Debug, Serialize)]
struct RestoreResponse {
    restored: RestoreSummary,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    skipped: Vec<SkippedRow>,
}

pub fn settings_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_settings).post(upsert_setting))
        .route("/backup", get(download_backup))
        .route("/restore", post(restore_from_snapshot))
        .route("/import-csv-backup", post(import_csv_backup))
        .route("/export-csv/:kind", get(export_csv_kind))
        .route("/reset-database", post(reset_database))
}

async fn list_settings(State(state): State<AppState>) -> Result<Response, ApiError> {
    Ok(success_response(state.services.settings.list()))
}

async fn upsert_setting(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<UpsertSettingRequest>,
) -> Result<Response, ApiError> {
    auth.require_role(&[Role::Admin])?;
    let setting = state.services.settings.upsert(request)?;
    Ok(success_response(setting))
}

fn text_download(filename: &str, content: String) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        content,
    )
        .into_response()
}

/// Full backup as the section-delimited text file.
async fn download_backup(State(state): State<AppState>, auth: AuthUser) -> Result<Response, ApiError> {
    auth.require_role(&[Role::Admin, Role::Manager])?;
    let snapshot = create_backup(&state.store);
    Ok(text_download("cafepos-backup.txt", serialize_to_text(&snapshot)))
}

/// Restore from a JSON snapshot (the shape `GET /settings/backup` serializes).
async fn restore_from_snapshot(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(snapshot): Json<BackupSnapshot>,
) -> Result<Response, ApiError> {
    auth.require_role(&[Role::Admin])?;
    let restored = restore_snapshot(&state.store, &snapshot);
    Ok(success_response(RestoreResponse {
        restored,
        skipped: Vec::new(),
    }))
}

/// Restore from the text format. Unknown sections are ignored; skipped rows
/// come back in the response so the caller can see what was dropped.
async fn import_csv_backup(
    State(state): State<AppState>,
    auth: AuthUser,
    body: String,
) -> Result<Response, ApiError> {
    auth.require_role(&[Role::Admin])?;
    let outcome = parse_text(&body);
    let restored = restore_snapshot(&state.store, &outcome.snapshot);
    Ok(success_response(RestoreResponse {
        restored,
        skipped: outcome.skipped,
    }))
}

async fn export_csv_kind(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(kind): Path<String>,
) -> Result<Response, ApiError> {
    auth.require_role(&[Role::Admin, Role::Manager])?;
    let kind = ExportKind::parse(&kind)?;
    let (filename, content) = export_csv(&state.store, kind);
    Ok(text_download(&filename, content))
}

async fn reset_database(State(state): State<AppState>, auth: AuthUser) -> Result<Response, ApiError> {
    auth.require_role(&[Role::Admin])?;
    state.services.settings.reset_database();
    Ok(no_content_response())
}
