//! Round-trip properties of the text backup format.

use cafepos_api::backup::{create_backup, parse_text, restore_snapshot, serialize_to_text};
use cafepos_api::models::{Category, DiningTable, Expense, ExpenseCategory, InventoryItem, MenuItem};
use cafepos_api::store::RecordStore;
use chrono::Utc;
use rust_decimal_macros::dec;

fn populated_store() -> RecordStore {
    let store = RecordStore::new();
    let hot = store.categories.insert(|id| Category {
        id,
        name: "Hot Beverages".into(),
        description: Some("Coffee and tea".into()),
    });
    store.categories.insert(|id| Category {
        id,
        name: "Snacks".into(),
        description: None,
    });
    store.menu_items.insert(|id| MenuItem {
        id,
        name: "Filter Coffee".into(),
        description: Some("Strong, with chicory".into()),
        price: dec!(20),
        category_id: Some(hot.id),
        tax_rate: dec!(5),
        available: true,
        stock_quantity: Some(10),
    });
    store.inventory.insert(|id| InventoryItem {
        id,
        name: "Milk".into(),
        quantity: dec!(5),
        unit: "litre".into(),
        alert_threshold: Some(dec!(2)),
        cost: Some(dec!(50)),
    });
    store.tables.insert(|id| DiningTable {
        id,
        name: "T1".into(),
        capacity: Some(4),
        occupied: false,
    });
    store.expenses.insert(|id| Expense {
        id,
        description: "Rent".into(),
        amount: dec!(12000),
        category: ExpenseCategory::Rent,
        date: Utc::now(),
        user_id: None,
        notes: None,
    });
    store
}

#[test]
fn text_round_trip_reproduces_named_entity_counts() {
    let source = populated_store();
    let text = serialize_to_text(&create_backup(&source));

    let target = RecordStore::new();
    let outcome = parse_text(&text);
    let summary = restore_snapshot(&target, &outcome.snapshot);

    assert_eq!(target.categories.len(), 2);
    assert_eq!(target.menu_items.len(), 1);
    assert_eq!(target.inventory.len(), 1);
    assert_eq!(target.tables.len(), 1);
    assert_eq!(summary.categories, 2);
    assert_eq!(summary.menu_items, 1);

    // Expenses are written to the text file but the parser does not read
    // them back; the restored store has none.
    assert!(target.expenses.is_empty());
    assert!(text.contains("EXPENSES\n"));
    assert!(text.contains("\"Rent\""));

    let coffee = target.menu_items.find(|i| i.name == "Filter Coffee").unwrap();
    let hot = target
        .categories
        .find(|c| c.name == "Hot Beverages")
        .unwrap();
    assert_eq!(coffee.category_id, Some(hot.id));
    assert_eq!(coffee.price, dec!(20));
    assert_eq!(coffee.stock_quantity, Some(10));
}

#[test]
fn restoring_twice_changes_nothing_for_named_entities() {
    let source = populated_store();
    let text = serialize_to_text(&create_backup(&source));

    let target = RecordStore::new();
    restore_snapshot(&target, &parse_text(&text).snapshot);
    let categories_before = target.categories.len();
    let items_before = target.menu_items.len();

    restore_snapshot(&target, &parse_text(&text).snapshot);
    assert_eq!(target.categories.len(), categories_before);
    assert_eq!(target.menu_items.len(), items_before);
    assert_eq!(target.inventory.len(), 1);
    assert_eq!(target.tables.len(), 1);
}

#[test]
fn json_snapshot_restore_appends_expenses_each_time() {
    let source = populated_store();
    let snapshot = create_backup(&source);

    let target = RecordStore::new();
    restore_snapshot(&target, &snapshot);
    restore_snapshot(&target, &snapshot);
    assert_eq!(target.expenses.len(), 2);
}
