//! Applies a snapshot to the store.
//!
//! Restore order is fixed: categories, inventory, tables, then menu items
//! (so category references resolve), then expenses. Named entities upsert
//! by case-insensitive name; expenses always append. The restore is not
//! atomic: sections already applied stay committed if a later one fails.

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::models::{Category, DiningTable, Expense, InventoryItem, MenuItem};
use crate::store::RecordStore;

use super::snapshot::BackupSnapshot;

/// Per-entity counts of snapshot rows applied to the store. A menu-item row
/// dropped because no category exists to attach it to is not counted; the
/// counts reflect what the store accepted, not what the snapshot carried.
#[derive(Debug, Default, Clone, Serialize)]
pub struct RestoreSummary {
    pub categories: usize,
    pub inventory: usize,
    pub tables: usize,
    pub menu_items: usize,
    pub expenses: usize,
}

#[instrument(skip(store, snapshot), fields(
    categories = snapshot.categories.len(),
    menu_items = snapshot.menu_items.len(),
))]
pub fn restore_snapshot(store: &RecordStore, snapshot: &BackupSnapshot) -> RestoreSummary {
    let mut summary = RestoreSummary::default();

    for row in &snapshot.categories {
        match store
            .categories
            .find(|c| c.name.eq_ignore_ascii_case(&row.name))
        {
            Some(existing) => {
                store.categories.update(existing.id, |c| {
                    c.description = row.description.clone();
                });
            }
            None => {
                store.categories.insert(|id| Category {
                    id,
                    name: row.name.clone(),
                    description: row.description.clone(),
                });
            }
        }
        summary.categories += 1;
    }

    for row in &snapshot.inventory {
        match store
            .inventory
            .find(|i| i.name.eq_ignore_ascii_case(&row.name))
        {
            Some(existing) => {
                store.inventory.update(existing.id, |i| {
                    i.quantity = row.quantity;
                    i.unit = row.unit.clone();
                    i.alert_threshold = row.alert_threshold;
                    i.cost = row.cost;
                });
            }
            None => {
                store.inventory.insert(|id| InventoryItem {
                    id,
                    name: row.name.clone(),
                    quantity: row.quantity,
                    unit: row.unit.clone(),
                    alert_threshold: row.alert_threshold,
                    cost: row.cost,
                });
            }
        }
        summary.inventory += 1;
    }

    for row in &snapshot.tables {
        match store.tables.find(|t| t.name.eq_ignore_ascii_case(&row.name)) {
            Some(existing) => {
                store.tables.update(existing.id, |t| {
                    t.capacity = row.capacity;
                    t.occupied = row.occupied;
                });
            }
            None => {
                store.tables.insert(|id| DiningTable {
                    id,
                    name: row.name.clone(),
                    capacity: row.capacity,
                    occupied: row.occupied,
                });
            }
        }
        summary.tables += 1;
    }

    // Category references resolve by name; an unknown name falls back to the
    // first category. With no categories at all the item is skipped.
    let mut categories = store.categories.all();
    categories.sort_by_key(|c| c.id);
    let fallback_category_id = categories.first().map(|c| c.id);

    for row in &snapshot.menu_items {
        let category_id = row
            .category_name
            .as_deref()
            .and_then(|name| {
                store
                    .categories
                    .find(|c| c.name.eq_ignore_ascii_case(name))
                    .map(|c| c.id)
            })
            .or(fallback_category_id);

        if category_id.is_none() {
            warn!(item = %row.name, "menu item skipped: no category to attach to");
            continue;
        }

        match store
            .menu_items
            .find(|i| i.name.eq_ignore_ascii_case(&row.name))
        {
            Some(existing) => {
                store.menu_items.update(existing.id, |i| {
                    i.description = row.description.clone();
                    i.price = row.price;
                    i.category_id = category_id;
                    i.tax_rate = row.tax_rate;
                    i.available = row.available;
                    i.stock_quantity = row.stock_quantity;
                });
            }
            None => {
                store.menu_items.insert(|id| MenuItem {
                    id,
                    name: row.name.clone(),
                    description: row.description.clone(),
                    price: row.price,
                    category_id,
                    tax_rate: row.tax_rate,
                    available: row.available,
                    stock_quantity: row.stock_quantity,
                });
            }
        }
        summary.menu_items += 1;
    }

    for row in &snapshot.expenses {
        store.expenses.insert(|id| Expense {
            id,
            description: row.description.clone(),
            amount: row.amount,
            category: row.category,
            date: row.date,
            user_id: None,
            notes: row.notes.clone(),
        });
        summary.expenses += 1;
    }

    info!(
        categories = summary.categories,
        inventory = summary.inventory,
        tables = summary.tables,
        menu_items = summary.menu_items,
        expenses = summary.expenses,
        "restore applied"
    );
    summary
}
