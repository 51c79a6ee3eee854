//! HTTP layer: one router per resource, nested under `/api/v1` by
//! [`crate::api_v1_routes`]. Role gates live here, at the route boundary.

pub mod auth;
pub mod categories;
pub mod common;
pub mod expenses;
pub mod inventory;
pub mod menu_items;
pub mod order_items;
pub mod orders;
pub mod reports;
pub mod settings;
pub mod shifts;
pub mod tables;
pub mod users;

use std::sync::Arc;

use crate::services::{
    CatalogService, ExpenseService, InventoryService, OrderService, ReportService,
    SettingsService, ShiftService, TableService, UserService,
};
use crate::store::RecordStore;

pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers.
#[derive(Clone)]
pub struct AppServices {
    pub catalog: Arc<CatalogService>,
    pub inventory: Arc<InventoryService>,
    pub tables: Arc<TableService>,
    pub orders: Arc<OrderService>,
    pub shifts: Arc<ShiftService>,
    pub expenses: Arc<ExpenseService>,
    pub settings: Arc<SettingsService>,
    pub users: Arc<UserService>,
    pub reports: Arc<ReportService>,
}

impl AppServices {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self {
            catalog: Arc::new(CatalogService::new(store.clone())),
            inventory: Arc::new(InventoryService::new(store.clone())),
            tables: Arc::new(TableService::new(store.clone())),
            orders: Arc::new(OrderService::new(store.clone())),
            shifts: Arc::new(ShiftService::new(store.clone())),
            expenses: Arc::new(ExpenseService::new(store.clone())),
            settings: Arc::new(SettingsService::new(store.clone())),
            users: Arc::new(UserService::new(store.clone())),
            reports: Arc::new(ReportService::new(store)),
        }
    }
}
