//! Side-effect pipeline for multi-entity mutations.
//!
//! A mutator validates and performs its primary write, then returns the
//! secondary writes it implies as [`SideEffect`] values. [`apply_effects`]
//! runs them in order against the store; an effect that cannot be applied
//! becomes an [`EffectWarning`] on the result instead of failing the
//! already-committed primary operation.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use crate::models::{Expense, ExpenseCategory};
use crate::store::RecordStore;

/// A secondary write implied by a primary mutation.
#[derive(Debug, Clone)]
pub enum SideEffect {
    /// Reduce a menu item's tracked stock by `quantity` units.
    DecrementStock { menu_item_id: i64, quantity: i32 },

    /// Recompute an order's `total_amount` and `tax_amount` from the full
    /// current set of its items.
    RecomputeOrderTotals { order_id: i64 },

    /// Mark a dining table occupied or free.
    SetTableOccupied { table_id: i64, occupied: bool },

    /// Append an inventory expense for a purchase/restock that carried a
    /// per-unit cost.
    RecordInventoryExpense {
        item_name: String,
        amount: Decimal,
        user_id: Option<i64>,
    },
}

impl SideEffect {
    fn kind(&self) -> &'static str {
        match self {
            SideEffect::DecrementStock { .. } => "decrement_stock",
            SideEffect::RecomputeOrderTotals { .. } => "recompute_order_totals",
            SideEffect::SetTableOccupied { .. } => "set_table_occupied",
            SideEffect::RecordInventoryExpense { .. } => "record_inventory_expense",
        }
    }
}

/// A secondary write that could not be applied. Carried on the response so
/// clients can surface it without the primary operation failing.
#[derive(Debug, Clone, Serialize)]
pub struct EffectWarning {
    pub effect: &'static str,
    pub message: String,
}

/// Primary mutation result plus any warnings from its side effects.
#[derive(Debug)]
pub struct Mutated<T> {
    pub value: T,
    pub warnings: Vec<EffectWarning>,
}

impl<T> Mutated<T> {
    pub fn clean(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }
}

/// Applies effects in order, collecting a warning for each one that fails.
pub fn apply_effects(store: &RecordStore, effects: Vec<SideEffect>) -> Vec<EffectWarning> {
    let mut warnings = Vec::new();
    for effect in effects {
        let kind = effect.kind();
        if let Err(message) = apply_one(store, effect) {
            warn!(effect = kind, %message, "side effect not applied");
            warnings.push(EffectWarning {
                effect: kind,
                message,
            });
        }
    }
    warnings
}

fn apply_one(store: &RecordStore, effect: SideEffect) -> Result<(), String> {
    match effect {
        SideEffect::DecrementStock {
            menu_item_id,
            quantity,
        } => {
            let updated = store.menu_items.update(menu_item_id, |item| {
                if let Some(stock) = item.stock_quantity.as_mut() {
                    *stock -= quantity;
                }
            });
            match updated {
                Some(_) => Ok(()),
                None => Err(format!("menu item {} no longer exists", menu_item_id)),
            }
        }
        SideEffect::RecomputeOrderTotals { order_id } => {
            recompute_order_totals(store, order_id)
                .ok_or_else(|| format!("order {} no longer exists", order_id))
                .map(|_| ())
        }
        SideEffect::SetTableOccupied { table_id, occupied } => store
            .tables
            .update(table_id, |table| table.occupied = occupied)
            .map(|_| ())
            .ok_or_else(|| format!("table {} no longer exists", table_id)),
        SideEffect::RecordInventoryExpense {
            item_name,
            amount,
            user_id,
        } => {
            if amount <= Decimal::ZERO {
                return Err(format!(
                    "inventory expense for '{}' has non-positive amount {}",
                    item_name, amount
                ));
            }
            store.expenses.insert(|id| Expense {
                id,
                description: format!("Inventory purchase: {}", item_name),
                amount,
                category: ExpenseCategory::Inventory,
                date: Utc::now(),
                user_id,
                notes: None,
            });
            Ok(())
        }
    }
}

/// Recomputes an order's totals from its items: the subtotal is the sum of
/// line totals, the tax is each line total times its menu item's current tax
/// rate. Lines whose menu item was deleted still count toward the subtotal
/// but contribute no tax.
pub fn recompute_order_totals(store: &RecordStore, order_id: i64) -> Option<crate::models::Order> {
    let items = store.order_items.filter(|item| item.order_id == order_id);

    let mut subtotal = Decimal::ZERO;
    let mut tax = Decimal::ZERO;
    for item in &items {
        subtotal += item.total_price;
        if let Some(menu_item) = store.menu_items.get(item.menu_item_id) {
            tax += item.total_price * menu_item.tax_rate / Decimal::from(100);
        }
    }

    store.orders.update(order_id, |order| {
        order.total_amount = subtotal;
        order.tax_amount = tax;
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MenuItem, Order, OrderItem, OrderStatus, TaxType};
    use rust_decimal_macros::dec;

    fn store_with_order() -> (RecordStore, i64, i64) {
        let store = RecordStore::new();
        let item = store.menu_items.insert(|id| MenuItem {
            id,
            name: "Filter Coffee".into(),
            description: None,
            price: dec!(20),
            category_id: None,
            tax_rate: dec!(5),
            available: true,
            stock_quantity: Some(10),
        });
        let order = store.orders.insert(|id| Order {
            id,
            table_id: None,
            user_id: None,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
            completed_at: None,
            total_amount: Decimal::ZERO,
            tax_amount: Decimal::ZERO,
            tax_type: TaxType::CgstSgst,
            discount: Decimal::ZERO,
            payment_method: None,
            customer_name: None,
            customer_phone: None,
            customer_gstin: None,
            invoice_number: None,
            notes: None,
        });
        (store, order.id, item.id)
    }

    #[test]
    fn recompute_sums_lines_and_tax() {
        let (store, order_id, menu_item_id) = store_with_order();
        store.order_items.insert(|id| OrderItem {
            id,
            order_id,
            menu_item_id,
            quantity: 3,
            unit_price: dec!(20),
            total_price: dec!(60),
            notes: None,
        });

        let order = recompute_order_totals(&store, order_id).unwrap();
        assert_eq!(order.total_amount, dec!(60));
        assert_eq!(order.tax_amount, dec!(3.00));
    }

    #[test]
    fn missing_menu_item_contributes_no_tax() {
        let (store, order_id, menu_item_id) = store_with_order();
        store.order_items.insert(|id| OrderItem {
            id,
            order_id,
            menu_item_id,
            quantity: 1,
            unit_price: dec!(20),
            total_price: dec!(20),
            notes: None,
        });
        store.menu_items.remove(menu_item_id);

        let order = recompute_order_totals(&store, order_id).unwrap();
        assert_eq!(order.total_amount, dec!(20));
        assert_eq!(order.tax_amount, Decimal::ZERO);
    }

    #[test]
    fn failed_effect_becomes_warning() {
        let store = RecordStore::new();
        let warnings = apply_effects(
            &store,
            vec![SideEffect::SetTableOccupied {
                table_id: 99,
                occupied: true,
            }],
        );
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].effect, "set_table_occupied");
    }

    #[test]
    fn inventory_expense_is_appended() {
        let store = RecordStore::new();
        let warnings = apply_effects(
            &store,
            vec![SideEffect::RecordInventoryExpense {
                item_name: "Milk".into(),
                amount: dec!(250),
                user_id: Some(1),
            }],
        );
        assert!(warnings.is_empty());
        let expenses = store.expenses.all();
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].amount, dec!(250));
        assert_eq!(expenses[0].category, ExpenseCategory::Inventory);
    }
}
