//! Café POS back-office API.
//!
//! This crate provides the full back office for a single-location café:
//! - Catalog, inventory, table, order, shift, setting and expense services
//!   over an in-memory record store
//! - JWT session authentication with per-route role gates
//! - Backup/restore through a section-delimited text format plus CSV exports
//! - Sales reporting over a date range

pub mod auth;
pub mod backup;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod seed;
pub mod services;
pub mod store;

use std::sync::Arc;

use axum::{routing::get, Json, Router};
use chrono::Duration as ChronoDuration;

use crate::auth::{AuthConfig, AuthService};
use crate::config::AppConfig;
use crate::handlers::AppServices;
use crate::store::RecordStore;

/// Shared state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<RecordStore>,
    pub services: AppServices,
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<RecordStore>) -> Self {
        let auth = Arc::new(AuthService::new(
            AuthConfig {
                jwt_secret: config.jwt_secret.clone(),
                access_token_expiration: ChronoDuration::seconds(config.jwt_expiration as i64),
            },
            store.clone(),
        ));
        Self {
            config: Arc::new(config),
            services: AppServices::new(store.clone()),
            store,
            auth,
        }
    }
}

/// The full `/api/v1` surface.
pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", handlers::auth::auth_routes())
        .nest("/users", handlers::users::user_routes())
        .nest("/categories", handlers::categories::category_routes())
        .nest("/menu-items", handlers::menu_items::menu_item_routes())
        .nest("/inventory", handlers::inventory::inventory_routes())
        .nest("/tables", handlers::tables::table_routes())
        .nest("/orders", handlers::orders::order_routes())
        .nest("/order-items", handlers::order_items::order_item_routes())
        .nest("/shifts", handlers::shifts::shift_routes())
        .nest("/settings", handlers::settings::settings_routes())
        .nest("/expenses", handlers::expenses::expense_routes())
        .nest("/reports", handlers::reports::report_routes())
}

/// Root router: liveness probe plus the versioned API.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/health",
            get(|| async { Json(serde_json::json!({ "status": "ok" })) }),
        )
        .nest("/api/v1", api_v1_routes())
        .with_state(state)
}
