//! Business logic layer. Each service owns one resource, takes the shared
//! [`RecordStore`](crate::store::RecordStore) by `Arc`, and reports failures
//! as [`ServiceError`](crate::errors::ServiceError).
//!
//! Mutations that touch more than one entity type describe their secondary
//! writes as [`effects::SideEffect`]s; the effect processor applies them and
//! turns failures into warnings instead of failing the primary operation.

pub mod catalog;
pub mod effects;
pub mod expenses;
pub mod inventory;
pub mod orders;
pub mod reports;
pub mod settings;
pub mod shifts;
pub mod tables;
pub mod users;

pub use catalog::CatalogService;
pub use expenses::ExpenseService;
pub use inventory::InventoryService;
pub use orders::OrderService;
pub use reports::ReportService;
pub use settings::SettingsService;
pub use shifts::ShiftService;
pub use tables::TableService;
pub use users::UserService;
