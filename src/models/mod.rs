//! Domain model types for the café back office.
//!
//! All monetary amounts and fractional quantities use `rust_decimal::Decimal`;
//! timestamps are `chrono::DateTime<Utc>`.

pub mod catalog;
pub mod expense;
pub mod inventory;
pub mod order;
pub mod setting;
pub mod shift;
pub mod table;
pub mod user;

pub use catalog::{Category, MenuItem};
pub use expense::{Expense, ExpenseCategory};
pub use inventory::InventoryItem;
pub use order::{Order, OrderItem, OrderStatus, PaymentMethod, TaxType};
pub use setting::{Setting, SettingType};
pub use shift::EmployeeShift;
pub use table::DiningTable;
pub use user::{Role, User};
