//! Orders and order items.
//!
//! Order items snapshot the menu item's price at creation time and keep it
//! through later price changes. Every item create/update/delete recomputes
//! the parent order's totals from the full current set of its items.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use validator::Validate;

use crate::{
    errors::ServiceError,
    models::{Order, OrderItem, OrderStatus, PaymentMethod, TaxType},
    services::effects::{apply_effects, Mutated, SideEffect},
    store::RecordStore,
};

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateOrderRequest {
    /// `None` means takeaway.
    pub table_id: Option<i64>,
    pub tax_type: Option<TaxType>,
    pub discount: Option<Decimal>,
    pub payment_method: Option<PaymentMethod>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_gstin: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpdateOrderRequest {
    pub status: Option<OrderStatus>,
    pub payment_method: Option<PaymentMethod>,
    pub discount: Option<Decimal>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_gstin: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateOrderItemRequest {
    pub order_id: i64,
    pub menu_item_id: i64,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpdateOrderItemRequest {
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: Option<i32>,
    pub notes: Option<String>,
}

/// An order together with its line items, as returned by the detail endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[derive(Clone)]
pub struct OrderService {
    store: Arc<RecordStore>,
}

impl OrderService {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }

    /// All orders, newest first.
    pub fn list(&self) -> Vec<Order> {
        let mut orders = self.store.orders.all();
        orders.sort_by(|a, b| b.id.cmp(&a.id));
        orders
    }

    /// Orders still in a non-terminal status, newest first.
    pub fn active(&self) -> Vec<Order> {
        let mut orders = self.store.orders.filter(|o| !o.status.is_terminal());
        orders.sort_by(|a, b| b.id.cmp(&a.id));
        orders
    }

    pub fn get(&self, id: i64) -> Result<OrderWithItems, ServiceError> {
        let order = self
            .store
            .orders
            .get(id)
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", id)))?;
        let mut items = self.store.order_items.filter(|i| i.order_id == id);
        items.sort_by_key(|i| i.id);
        Ok(OrderWithItems { order, items })
    }

    /// Creates a pending order. A referenced table must exist and is marked
    /// occupied as a side effect.
    #[instrument(skip(self, request), fields(table_id = ?request.table_id))]
    pub fn create(
        &self,
        request: CreateOrderRequest,
        user_id: Option<i64>,
    ) -> Result<Mutated<Order>, ServiceError> {
        request.validate()?;

        if let Some(table_id) = request.table_id {
            if self.store.tables.get(table_id).is_none() {
                return Err(ServiceError::NotFound(format!(
                    "Table {} not found",
                    table_id
                )));
            }
        }

        let order = self.store.orders.insert(|id| Order {
            id,
            table_id: request.table_id,
            user_id,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
            completed_at: None,
            total_amount: Decimal::ZERO,
            tax_amount: Decimal::ZERO,
            tax_type: request.tax_type.unwrap_or(TaxType::CgstSgst),
            discount: request.discount.unwrap_or(Decimal::ZERO),
            payment_method: request.payment_method,
            customer_name: request.customer_name.clone(),
            customer_phone: request.customer_phone.clone(),
            customer_gstin: request.customer_gstin.clone(),
            invoice_number: Some(format!("INV-{:06}", id)),
            notes: request.notes.clone(),
        });
        info!(order_id = order.id, "order created");

        let mut effects = Vec::new();
        if let Some(table_id) = order.table_id {
            effects.push(SideEffect::SetTableOccupied {
                table_id,
                occupied: true,
            });
        }
        let warnings = apply_effects(&self.store, effects);
        Ok(Mutated {
            value: order,
            warnings,
        })
    }

    /// Patches an order. `completed_at` is stamped exactly when the status
    /// transitions into `completed`; table occupancy is not touched.
    #[instrument(skip(self, request))]
    pub fn update(&self, id: i64, request: UpdateOrderRequest) -> Result<Order, ServiceError> {
        request.validate()?;

        self.store
            .orders
            .update(id, |order| {
                if let Some(status) = request.status {
                    if status == OrderStatus::Completed && order.status != OrderStatus::Completed {
                        order.completed_at = Some(Utc::now());
                    }
                    order.status = status;
                }
                if request.payment_method.is_some() {
                    order.payment_method = request.payment_method;
                }
                if let Some(discount) = request.discount {
                    order.discount = discount;
                }
                if request.customer_name.is_some() {
                    order.customer_name = request.customer_name.clone();
                }
                if request.customer_phone.is_some() {
                    order.customer_phone = request.customer_phone.clone();
                }
                if request.customer_gstin.is_some() {
                    order.customer_gstin = request.customer_gstin.clone();
                }
                if request.notes.is_some() {
                    order.notes = request.notes.clone();
                }
            })
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", id)))
    }

    /// Adds a line to an order. The stock check happens before any write:
    /// rejecting the line leaves the order, the item and the stock untouched.
    #[instrument(skip(self, request), fields(order_id = request.order_id, menu_item_id = request.menu_item_id))]
    pub fn create_item(
        &self,
        request: CreateOrderItemRequest,
    ) -> Result<Mutated<OrderItem>, ServiceError> {
        request.validate()?;

        if self.store.orders.get(request.order_id).is_none() {
            return Err(ServiceError::NotFound(format!(
                "Order {} not found",
                request.order_id
            )));
        }
        let menu_item = self
            .store
            .menu_items
            .get(request.menu_item_id)
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Menu item {} not found", request.menu_item_id))
            })?;

        if let Some(stock) = menu_item.stock_quantity {
            if stock - request.quantity < 0 {
                return Err(ServiceError::InsufficientStock(format!(
                    "'{}' has only {} in stock",
                    menu_item.name, stock
                )));
            }
        }

        let unit_price = menu_item.price;
        let item = self.store.order_items.insert(|id| OrderItem {
            id,
            order_id: request.order_id,
            menu_item_id: request.menu_item_id,
            quantity: request.quantity,
            unit_price,
            total_price: unit_price * Decimal::from(request.quantity),
            notes: request.notes.clone(),
        });
        info!(order_item_id = item.id, "order item created");

        let mut effects = vec![SideEffect::RecomputeOrderTotals {
            order_id: request.order_id,
        }];
        if menu_item.stock_quantity.is_some() {
            effects.insert(
                0,
                SideEffect::DecrementStock {
                    menu_item_id: request.menu_item_id,
                    quantity: request.quantity,
                },
            );
        }
        let warnings = apply_effects(&self.store, effects);
        Ok(Mutated {
            value: item,
            warnings,
        })
    }

    /// Changes a line's quantity or notes. The unit price snapshot is kept;
    /// stock is not re-adjusted.
    #[instrument(skip(self, request))]
    pub fn update_item(
        &self,
        id: i64,
        request: UpdateOrderItemRequest,
    ) -> Result<Mutated<OrderItem>, ServiceError> {
        request.validate()?;

        let item = self
            .store
            .order_items
            .update(id, |item| {
                if let Some(quantity) = request.quantity {
                    item.quantity = quantity;
                    item.total_price = item.unit_price * Decimal::from(quantity);
                }
                if request.notes.is_some() {
                    item.notes = request.notes.clone();
                }
            })
            .ok_or_else(|| ServiceError::NotFound(format!("Order item {} not found", id)))?;

        let warnings = apply_effects(
            &self.store,
            vec![SideEffect::RecomputeOrderTotals {
                order_id: item.order_id,
            }],
        );
        Ok(Mutated {
            value: item,
            warnings,
        })
    }

    /// Removes a line. Stock is not restored (matching how voided lines were
    /// handled historically).
    #[instrument(skip(self))]
    pub fn delete_item(&self, id: i64) -> Result<Mutated<()>, ServiceError> {
        let item = self
            .store
            .order_items
            .remove(id)
            .ok_or_else(|| ServiceError::NotFound(format!("Order item {} not found", id)))?;

        let warnings = apply_effects(
            &self.store,
            vec![SideEffect::RecomputeOrderTotals {
                order_id: item.order_id,
            }],
        );
        Ok(Mutated {
            value: (),
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::catalog::{CatalogService, CreateCategoryRequest, CreateMenuItemRequest};
    use crate::services::tables::{CreateTableRequest, TableService};
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;

    struct Fixture {
        store: Arc<RecordStore>,
        orders: OrderService,
        coffee_id: i64,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(RecordStore::new());
        let catalog = CatalogService::new(store.clone());
        let cat = catalog
            .create_category(CreateCategoryRequest {
                name: "Hot Beverages".into(),
                description: None,
            })
            .unwrap();
        let coffee = catalog
            .create_menu_item(CreateMenuItemRequest {
                name: "Filter Coffee".into(),
                description: None,
                price: dec!(20),
                category_id: Some(cat.id),
                tax_rate: Some(dec!(5)),
                available: true,
                stock_quantity: Some(10),
            })
            .unwrap();
        Fixture {
            orders: OrderService::new(store.clone()),
            store,
            coffee_id: coffee.id,
        }
    }

    fn takeaway(fx: &Fixture) -> Order {
        fx.orders
            .create(
                CreateOrderRequest {
                    table_id: None,
                    tax_type: None,
                    discount: None,
                    payment_method: None,
                    customer_name: None,
                    customer_phone: None,
                    customer_gstin: None,
                    notes: None,
                },
                Some(1),
            )
            .unwrap()
            .value
    }

    #[test]
    fn order_item_updates_totals_and_stock() {
        let fx = fixture();
        let order = takeaway(&fx);

        fx.orders
            .create_item(CreateOrderItemRequest {
                order_id: order.id,
                menu_item_id: fx.coffee_id,
                quantity: 3,
                notes: None,
            })
            .unwrap();

        let refreshed = fx.orders.get(order.id).unwrap();
        assert_eq!(refreshed.order.total_amount, dec!(60));
        assert_eq!(refreshed.order.tax_amount, dec!(3.00));
        assert_eq!(
            fx.store.menu_items.get(fx.coffee_id).unwrap().stock_quantity,
            Some(7)
        );
    }

    #[test]
    fn insufficient_stock_mutates_nothing() {
        let fx = fixture();
        let order = takeaway(&fx);

        let err = fx
            .orders
            .create_item(CreateOrderItemRequest {
                order_id: order.id,
                menu_item_id: fx.coffee_id,
                quantity: 11,
                notes: None,
            })
            .unwrap_err();
        assert_matches!(err, ServiceError::InsufficientStock(_));

        let refreshed = fx.orders.get(order.id).unwrap();
        assert!(refreshed.items.is_empty());
        assert_eq!(refreshed.order.total_amount, Decimal::ZERO);
        assert_eq!(
            fx.store.menu_items.get(fx.coffee_id).unwrap().stock_quantity,
            Some(10)
        );
    }

    #[test]
    fn price_snapshot_survives_price_change() {
        let fx = fixture();
        let order = takeaway(&fx);
        fx.orders
            .create_item(CreateOrderItemRequest {
                order_id: order.id,
                menu_item_id: fx.coffee_id,
                quantity: 1,
                notes: None,
            })
            .unwrap();

        fx.store
            .menu_items
            .update(fx.coffee_id, |item| item.price = dec!(30));

        let updated = fx
            .orders
            .update_item(
                order.id,
                UpdateOrderItemRequest {
                    quantity: Some(2),
                    notes: None,
                },
            )
            .unwrap()
            .value;
        assert_eq!(updated.unit_price, dec!(20));
        assert_eq!(updated.total_price, dec!(40));
    }

    #[test]
    fn completion_stamps_completed_at_but_keeps_table_occupied() {
        let fx = fixture();
        let tables = TableService::new(fx.store.clone());
        let table = tables
            .create(CreateTableRequest {
                name: "T1".into(),
                capacity: Some(2),
            })
            .unwrap();

        let order = fx
            .orders
            .create(
                CreateOrderRequest {
                    table_id: Some(table.id),
                    tax_type: None,
                    discount: None,
                    payment_method: None,
                    customer_name: None,
                    customer_phone: None,
                    customer_gstin: None,
                    notes: None,
                },
                None,
            )
            .unwrap()
            .value;
        assert!(fx.store.tables.get(table.id).unwrap().occupied);

        let completed = fx
            .orders
            .update(
                order.id,
                UpdateOrderRequest {
                    status: Some(OrderStatus::Completed),
                    payment_method: Some(PaymentMethod::Cash),
                    discount: None,
                    customer_name: None,
                    customer_phone: None,
                    customer_gstin: None,
                    notes: None,
                },
            )
            .unwrap();
        assert!(completed.completed_at.is_some());
        assert!(fx.store.tables.get(table.id).unwrap().occupied);

        // Re-sending completed does not move the timestamp.
        let stamp = completed.completed_at;
        let again = fx
            .orders
            .update(
                order.id,
                UpdateOrderRequest {
                    status: Some(OrderStatus::Completed),
                    payment_method: None,
                    discount: None,
                    customer_name: None,
                    customer_phone: None,
                    customer_gstin: None,
                    notes: None,
                },
            )
            .unwrap();
        assert_eq!(again.completed_at, stamp);
    }

    #[test]
    fn deleting_item_recomputes_totals_without_restock() {
        let fx = fixture();
        let order = takeaway(&fx);
        let item = fx
            .orders
            .create_item(CreateOrderItemRequest {
                order_id: order.id,
                menu_item_id: fx.coffee_id,
                quantity: 2,
                notes: None,
            })
            .unwrap()
            .value;

        fx.orders.delete_item(item.id).unwrap();
        let refreshed = fx.orders.get(order.id).unwrap();
        assert_eq!(refreshed.order.total_amount, Decimal::ZERO);
        assert_eq!(
            fx.store.menu_items.get(fx.coffee_id).unwrap().stock_quantity,
            Some(8)
        );
    }

    #[test]
    fn active_excludes_terminal_orders() {
        let fx = fixture();
        let a = takeaway(&fx);
        let b = takeaway(&fx);
        fx.orders
            .update(
                a.id,
                UpdateOrderRequest {
                    status: Some(OrderStatus::Cancelled),
                    payment_method: None,
                    discount: None,
                    customer_name: None,
                    customer_phone: None,
                    customer_gstin: None,
                    notes: None,
                },
            )
            .unwrap();

        let active = fx.orders.active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, b.id);
    }

    #[test]
    fn invoice_number_is_assigned_at_creation() {
        let fx = fixture();
        let order = takeaway(&fx);
        assert_eq!(
            order.invoice_number.as_deref(),
            Some(format!("INV-{:06}", order.id).as_str())
        );
    }
}
