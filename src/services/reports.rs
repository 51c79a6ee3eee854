//! Sales reporting over a date range.
//!
//! Sales figures are recomputed from order items rather than read from the
//! stored order totals, and taxes use each menu item's current tax rate, so
//! the report reflects the catalog as it stands at query time.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    errors::ServiceError,
    models::{Expense, ExpenseCategory, Order, OrderStatus, PaymentMethod},
    store::RecordStore,
};

/// Cost-of-goods estimate used when no per-item costing exists: a flat 40%
/// of revenue.
const COGS_RATIO: Decimal = dec!(0.4);

const TOP_ITEMS: usize = 10;

#[derive(Debug, Serialize, Deserialize)]
pub struct TrendPoint {
    /// ISO date (`YYYY-MM-DD`).
    pub date: String,
    pub sales: Decimal,
    pub expenses: Decimal,
    /// `sales − expenses` for the bucket; an approximation because spread
    /// inventory valuation lands here too.
    pub profit: Decimal,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CategorySales {
    pub category_id: Option<i64>,
    pub name: String,
    pub amount: Decimal,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PopularItem {
    pub menu_item_id: i64,
    pub name: String,
    pub quantity: i64,
    pub revenue: Decimal,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SalesReport {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub total_orders: usize,
    pub completed_orders: usize,
    pub total_sales: Decimal,
    pub total_tax: Decimal,
    pub total_expenses: Decimal,
    pub estimated_cogs: Decimal,
    pub net_profit: Decimal,
    pub sales_trend: Vec<TrendPoint>,
    pub category_sales: Vec<CategorySales>,
    pub popular_items: Vec<PopularItem>,
    pub payment_method_totals: HashMap<PaymentMethod, Decimal>,
    pub expense_category_totals: HashMap<ExpenseCategory, Decimal>,
    pub orders: Vec<Order>,
    pub expenses: Vec<Expense>,
}

#[derive(Clone)]
pub struct ReportService {
    store: Arc<RecordStore>,
}

impl ReportService {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self))]
    pub fn sales_report(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<SalesReport, ServiceError> {
        if end < start {
            return Err(ServiceError::ValidationError(
                "end_date must not precede start_date".to_string(),
            ));
        }

        let mut orders = self
            .store
            .orders
            .filter(|o| o.created_at >= start && o.created_at <= end);
        orders.sort_by_key(|o| o.id);

        let mut total_sales = Decimal::ZERO;
        let mut total_tax = Decimal::ZERO;
        let mut completed_orders = 0usize;
        let mut sales_by_day: HashMap<String, Decimal> = HashMap::new();
        let mut sales_by_category: HashMap<Option<i64>, Decimal> = HashMap::new();
        let mut item_quantities: HashMap<i64, (i64, Decimal)> = HashMap::new();
        let mut payment_method_totals: HashMap<PaymentMethod, Decimal> = HashMap::new();

        for order in &orders {
            if order.status != OrderStatus::Completed {
                continue;
            }
            completed_orders += 1;

            let items = self.store.order_items.filter(|i| i.order_id == order.id);
            let mut subtotal = Decimal::ZERO;
            let mut tax = Decimal::ZERO;
            for item in &items {
                let line = item.unit_price * Decimal::from(item.quantity);
                subtotal += line;

                match self.store.menu_items.get(item.menu_item_id) {
                    Some(menu_item) => {
                        tax += line * menu_item.tax_rate / Decimal::from(100);
                        let bucket = sales_by_category
                            .entry(menu_item.category_id)
                            .or_insert(Decimal::ZERO);
                        *bucket += line;
                        let entry = item_quantities
                            .entry(item.menu_item_id)
                            .or_insert((0, Decimal::ZERO));
                        entry.0 += i64::from(item.quantity);
                        entry.1 += line;
                    }
                    None => {
                        *sales_by_category.entry(None).or_insert(Decimal::ZERO) += line;
                    }
                }
            }

            total_sales += subtotal;
            total_tax += tax;
            let day = order.created_at.format("%Y-%m-%d").to_string();
            *sales_by_day.entry(day).or_insert(Decimal::ZERO) += subtotal;
            if let Some(method) = order.payment_method {
                *payment_method_totals.entry(method).or_insert(Decimal::ZERO) += subtotal;
            }
        }

        let mut expenses = self
            .store
            .expenses
            .filter(|e| e.date >= start && e.date <= end);
        expenses.sort_by_key(|e| e.id);

        let mut expenses_by_day: HashMap<String, Decimal> = HashMap::new();
        let mut expense_category_totals: HashMap<ExpenseCategory, Decimal> = HashMap::new();
        let mut total_expenses = Decimal::ZERO;
        for expense in &expenses {
            total_expenses += expense.amount;
            *expense_category_totals
                .entry(expense.category)
                .or_insert(Decimal::ZERO) += expense.amount;
            let day = expense.date.format("%Y-%m-%d").to_string();
            *expenses_by_day.entry(day).or_insert(Decimal::ZERO) += expense.amount;
        }

        // Current stock valuation enters the report as one synthetic
        // inventory expense per costed item, dated now. It is not persisted.
        let mut inventory_valuation = Decimal::ZERO;
        for item in self.store.inventory.all() {
            if let Some(cost) = item.cost {
                if cost > Decimal::ZERO && item.quantity > Decimal::ZERO {
                    let amount = cost * item.quantity;
                    inventory_valuation += amount;
                    expenses.push(Expense {
                        id: 0,
                        description: format!("Inventory valuation: {}", item.name),
                        amount,
                        category: ExpenseCategory::Inventory,
                        date: Utc::now(),
                        user_id: None,
                        notes: None,
                    });
                }
            }
        }
        if inventory_valuation > Decimal::ZERO {
            total_expenses += inventory_valuation;
            *expense_category_totals
                .entry(ExpenseCategory::Inventory)
                .or_insert(Decimal::ZERO) += inventory_valuation;
        }

        // Trend buckets: every day that saw a sale or a recorded expense.
        // The synthetic inventory total is spread evenly over them.
        let mut days: Vec<String> = sales_by_day
            .keys()
            .chain(expenses_by_day.keys())
            .cloned()
            .collect();
        days.sort();
        days.dedup();

        let spread = if inventory_valuation > Decimal::ZERO && !days.is_empty() {
            inventory_valuation / Decimal::from(days.len() as i64)
        } else {
            Decimal::ZERO
        };

        let sales_trend = days
            .into_iter()
            .map(|date| {
                let sales = sales_by_day.get(&date).copied().unwrap_or(Decimal::ZERO);
                let day_expenses = expenses_by_day
                    .get(&date)
                    .copied()
                    .unwrap_or(Decimal::ZERO)
                    + spread;
                TrendPoint {
                    profit: sales - day_expenses,
                    date,
                    sales,
                    expenses: day_expenses,
                }
            })
            .collect();

        let mut category_sales: Vec<CategorySales> = sales_by_category
            .into_iter()
            .map(|(category_id, amount)| {
                let name = category_id
                    .and_then(|id| self.store.categories.get(id))
                    .map(|c| c.name)
                    .unwrap_or_else(|| "Uncategorized".to_string());
                CategorySales {
                    category_id,
                    name,
                    amount,
                }
            })
            .collect();
        category_sales.sort_by(|a, b| b.amount.cmp(&a.amount));

        let mut popular_items: Vec<PopularItem> = item_quantities
            .into_iter()
            .map(|(menu_item_id, (quantity, revenue))| {
                let name = self
                    .store
                    .menu_items
                    .get(menu_item_id)
                    .map(|i| i.name)
                    .unwrap_or_else(|| format!("Item {}", menu_item_id));
                PopularItem {
                    menu_item_id,
                    name,
                    quantity,
                    revenue,
                }
            })
            .collect();
        popular_items.sort_by(|a, b| b.quantity.cmp(&a.quantity).then(b.revenue.cmp(&a.revenue)));
        popular_items.truncate(TOP_ITEMS);

        let estimated_cogs = total_sales * COGS_RATIO;

        Ok(SalesReport {
            start_date: start,
            end_date: end,
            total_orders: orders.len(),
            completed_orders,
            total_sales,
            total_tax,
            total_expenses,
            estimated_cogs,
            net_profit: total_sales - total_expenses,
            sales_trend,
            category_sales,
            popular_items,
            payment_method_totals,
            expense_category_totals,
            orders,
            expenses,
        })
    }
}
