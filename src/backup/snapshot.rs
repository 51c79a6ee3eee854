//! Portable projection of the backed-up entities.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::ExpenseCategory;
use crate::store::RecordStore;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRow {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemRow {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    /// Category reference by name; ids do not survive a backup.
    pub category_name: Option<String>,
    pub tax_rate: Decimal,
    pub available: bool,
    pub stock_quantity: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryRow {
    pub name: String,
    pub quantity: Decimal,
    pub unit: String,
    pub alert_threshold: Option<Decimal>,
    pub cost: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableRow {
    pub name: String,
    pub capacity: Option<i32>,
    pub occupied: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseRow {
    pub description: String,
    pub amount: Decimal,
    pub category: ExpenseCategory,
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Everything a backup carries. Orders, shifts, users and settings are out
/// of scope for the interchange format.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackupSnapshot {
    #[serde(default)]
    pub categories: Vec<CategoryRow>,
    #[serde(default)]
    pub menu_items: Vec<MenuItemRow>,
    #[serde(default)]
    pub inventory: Vec<InventoryRow>,
    #[serde(default)]
    pub tables: Vec<TableRow>,
    #[serde(default)]
    pub expenses: Vec<ExpenseRow>,
}

/// Projects the store into a snapshot. A menu item whose `category_id`
/// dangles borrows the first category's name so the reference stays valid
/// on restore.
pub fn create_backup(store: &RecordStore) -> BackupSnapshot {
    let mut categories = store.categories.all();
    categories.sort_by_key(|c| c.id);
    let first_category_name = categories.first().map(|c| c.name.clone());

    let category_name_of = |id: Option<i64>| -> Option<String> {
        id.and_then(|id| store.categories.get(id))
            .map(|c| c.name)
            .or_else(|| first_category_name.clone())
    };

    let mut menu_items = store.menu_items.all();
    menu_items.sort_by_key(|i| i.id);
    let mut inventory = store.inventory.all();
    inventory.sort_by_key(|i| i.id);
    let mut tables = store.tables.all();
    tables.sort_by_key(|t| t.id);
    let mut expenses = store.expenses.all();
    expenses.sort_by_key(|e| e.id);

    BackupSnapshot {
        categories: categories
            .into_iter()
            .map(|c| CategoryRow {
                name: c.name,
                description: c.description,
            })
            .collect(),
        menu_items: menu_items
            .into_iter()
            .map(|i| MenuItemRow {
                category_name: category_name_of(i.category_id),
                name: i.name,
                description: i.description,
                price: i.price,
                tax_rate: i.tax_rate,
                available: i.available,
                stock_quantity: i.stock_quantity,
            })
            .collect(),
        inventory: inventory
            .into_iter()
            .map(|i| InventoryRow {
                name: i.name,
                quantity: i.quantity,
                unit: i.unit,
                alert_threshold: i.alert_threshold,
                cost: i.cost,
            })
            .collect(),
        tables: tables
            .into_iter()
            .map(|t| TableRow {
                name: t.name,
                capacity: t.capacity,
                occupied: t.occupied,
            })
            .collect(),
        expenses: expenses
            .into_iter()
            .map(|e| ExpenseRow {
                description: e.description,
                amount: e.amount,
                category: e.category,
                date: e.date,
                notes: e.notes,
            })
            .collect(),
    }
}
