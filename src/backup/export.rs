//! Per-entity and sales CSV exports.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use strum::{Display, EnumString};

use crate::errors::ServiceError;
use crate::models::{Order, OrderStatus};
use crate::store::RecordStore;

use super::snapshot::create_backup;
use super::text::{
    serialize_to_text, write_categories_section, write_expenses_section, write_inventory_section,
    write_menu_items_section, write_tables_section,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum ExportKind {
    All,
    MenuItems,
    Inventory,
    Categories,
    Expenses,
    Tables,
    SalesLedger,
    SalesDetails,
    DailySummary,
}

impl ExportKind {
    pub fn parse(value: &str) -> Result<Self, ServiceError> {
        value
            .parse()
            .map_err(|_| ServiceError::ValidationError(format!("Unknown export kind '{}'", value)))
    }
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn invoice_number(order: &Order) -> String {
    order
        .invoice_number
        .clone()
        .unwrap_or_else(|| format!("INV-{:06}", order.id))
}

/// Builds the export for `kind`, returning a suggested filename and the
/// CSV/text content.
pub fn export_csv(store: &RecordStore, kind: ExportKind) -> (String, String) {
    let filename = format!("cafepos-{}.csv", kind);
    let snapshot = create_backup(store);
    let mut out = String::new();

    match kind {
        ExportKind::All => return ("cafepos-backup.txt".to_string(), serialize_to_text(&snapshot)),
        ExportKind::Categories => write_categories_section(&mut out, &snapshot.categories),
        ExportKind::MenuItems => write_menu_items_section(&mut out, &snapshot.menu_items),
        ExportKind::Inventory => write_inventory_section(&mut out, &snapshot.inventory),
        ExportKind::Tables => write_tables_section(&mut out, &snapshot.tables),
        ExportKind::Expenses => write_expenses_section(&mut out, &snapshot.expenses),
        ExportKind::SalesLedger => write_sales_ledger(&mut out, store),
        ExportKind::SalesDetails => write_sales_details(&mut out, store),
        ExportKind::DailySummary => write_daily_summary(&mut out, store),
    }

    (filename, out)
}

fn sorted_orders(store: &RecordStore) -> Vec<Order> {
    let mut orders = store.orders.all();
    orders.sort_by_key(|o| o.id);
    orders
}

fn write_sales_ledger(out: &mut String, store: &RecordStore) {
    out.push_str("Invoice,Date,Status,Table,Customer,PaymentMethod,TaxType,Discount,Tax,Total\n");
    for order in sorted_orders(store) {
        let table = order
            .table_id
            .and_then(|id| store.tables.get(id))
            .map(|t| t.name)
            .unwrap_or_else(|| "Takeaway".to_string());
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{},{},{}\n",
            quote(&invoice_number(&order)),
            quote(&order.created_at.to_rfc3339()),
            order.status,
            quote(&table),
            quote(order.customer_name.as_deref().unwrap_or("")),
            order
                .payment_method
                .map(|m| m.to_string())
                .unwrap_or_default(),
            order.tax_type,
            order.discount,
            order.tax_amount,
            order.total_amount,
        ));
    }
}

fn write_sales_details(out: &mut String, store: &RecordStore) {
    out.push_str("Invoice,Date,Item,Category,Table,Quantity,UnitPrice,TotalPrice\n");
    for order in sorted_orders(store) {
        let table = order
            .table_id
            .and_then(|id| store.tables.get(id))
            .map(|t| t.name)
            .unwrap_or_else(|| "Takeaway".to_string());
        let mut items = store.order_items.filter(|i| i.order_id == order.id);
        items.sort_by_key(|i| i.id);
        for item in items {
            let menu_item = store.menu_items.get(item.menu_item_id);
            let item_name = menu_item
                .as_ref()
                .map(|i| i.name.clone())
                .unwrap_or_else(|| format!("Item {}", item.menu_item_id));
            let category = menu_item
                .and_then(|i| i.category_id)
                .and_then(|id| store.categories.get(id))
                .map(|c| c.name)
                .unwrap_or_else(|| "Uncategorized".to_string());
            out.push_str(&format!(
                "{},{},{},{},{},{},{},{}\n",
                quote(&invoice_number(&order)),
                quote(&order.created_at.to_rfc3339()),
                quote(&item_name),
                quote(&category),
                quote(&table),
                item.quantity,
                item.unit_price,
                item.total_price,
            ));
        }
    }
}

fn write_daily_summary(out: &mut String, store: &RecordStore) {
    out.push_str("Date,Orders,Sales,Tax\n");
    let mut days: BTreeMap<String, (usize, Decimal, Decimal)> = BTreeMap::new();
    for order in store.orders.all() {
        let entry = days
            .entry(order.created_at.format("%Y-%m-%d").to_string())
            .or_insert((0, Decimal::ZERO, Decimal::ZERO));
        entry.0 += 1;
        if order.status == OrderStatus::Completed {
            entry.1 += order.total_amount;
            entry.2 += order.tax_amount;
        }
    }
    for (date, (orders, sales, tax)) in days {
        out.push_str(&format!("{},{},{},{}\n", date, orders, sales, tax));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MenuItem, OrderItem, PaymentMethod, TaxType};
    use chrono::{DateTime, Utc};
    use rust_decimal_macros::dec;

    fn day(date: &str) -> DateTime<Utc> {
        format!("{}T10:00:00Z", date).parse().unwrap()
    }

    fn store_with_sale() -> RecordStore {
        let store = RecordStore::new();
        let coffee = store.menu_items.insert(|id| MenuItem {
            id,
            name: "Filter Coffee".into(),
            description: None,
            price: dec!(20),
            category_id: None,
            tax_rate: dec!(5),
            available: true,
            stock_quantity: None,
        });
        let order = store.orders.insert(|id| Order {
            id,
            table_id: None,
            user_id: None,
            status: OrderStatus::Completed,
            created_at: day("2024-03-01"),
            completed_at: Some(day("2024-03-01")),
            total_amount: dec!(60),
            tax_amount: dec!(3),
            tax_type: TaxType::CgstSgst,
            discount: Decimal::ZERO,
            payment_method: Some(PaymentMethod::Cash),
            customer_name: Some("Asha".into()),
            customer_phone: None,
            customer_gstin: None,
            invoice_number: None,
            notes: None,
        });
        store.order_items.insert(|id| OrderItem {
            id,
            order_id: order.id,
            menu_item_id: coffee.id,
            quantity: 3,
            unit_price: dec!(20),
            total_price: dec!(60),
            notes: None,
        });
        store
    }

    #[test]
    fn kind_parses_from_kebab_case() {
        assert_eq!(ExportKind::parse("sales-ledger").unwrap(), ExportKind::SalesLedger);
        assert_eq!(ExportKind::parse("menu-items").unwrap(), ExportKind::MenuItems);
        assert!(ExportKind::parse("bogus").is_err());
    }

    #[test]
    fn ledger_derives_missing_invoice_numbers() {
        let store = store_with_sale();
        let (_, csv) = export_csv(&store, ExportKind::SalesLedger);
        assert!(csv.contains("\"INV-000001\""));
        assert!(csv.contains("\"Takeaway\""));
        assert!(csv.contains("cash"));
    }

    #[test]
    fn details_join_item_names() {
        let store = store_with_sale();
        let (_, csv) = export_csv(&store, ExportKind::SalesDetails);
        assert!(csv.contains("\"Filter Coffee\""));
        assert!(csv.contains("\"Uncategorized\""));
    }

    #[test]
    fn daily_summary_counts_all_orders_but_sums_completed() {
        let store = store_with_sale();
        store.orders.insert(|id| Order {
            id,
            table_id: None,
            user_id: None,
            status: OrderStatus::Pending,
            created_at: day("2024-03-01"),
            completed_at: None,
            total_amount: dec!(999),
            tax_amount: dec!(9),
            tax_type: TaxType::CgstSgst,
            discount: Decimal::ZERO,
            payment_method: None,
            customer_name: None,
            customer_phone: None,
            customer_gstin: None,
            invoice_number: None,
            notes: None,
        });

        let (_, csv) = export_csv(&store, ExportKind::DailySummary);
        assert!(csv.contains("2024-03-01,2,60,3\n"));
    }

    #[test]
    fn all_kind_emits_the_full_backup_text() {
        let store = store_with_sale();
        let (filename, text) = export_csv(&store, ExportKind::All);
        assert_eq!(filename, "cafepos-backup.txt");
        assert!(text.contains("CATEGORIES\n"));
        assert!(text.contains("EXPENSES\n"));
    }
}
