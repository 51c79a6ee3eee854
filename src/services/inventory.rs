//! Inventory tracking. Purchases and restocks that carry a per-unit cost
//! auto-create an inventory expense through the effect pipeline.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use validator::Validate;

use crate::{
    errors::ServiceError,
    models::InventoryItem,
    services::effects::{apply_effects, Mutated, SideEffect},
    store::RecordStore,
};

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateInventoryItemRequest {
    #[validate(length(min = 1, message = "Item name is required"))]
    pub name: String,
    pub quantity: Decimal,
    #[validate(length(min = 1, message = "Unit is required"))]
    pub unit: String,
    pub alert_threshold: Option<Decimal>,
    pub cost: Option<Decimal>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpdateInventoryItemRequest {
    #[validate(length(min = 1, message = "Item name must not be empty"))]
    pub name: Option<String>,
    pub quantity: Option<Decimal>,
    #[validate(length(min = 1, message = "Unit must not be empty"))]
    pub unit: Option<String>,
    pub alert_threshold: Option<Decimal>,
    pub cost: Option<Decimal>,
}

#[derive(Clone)]
pub struct InventoryService {
    store: Arc<RecordStore>,
}

impl InventoryService {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Vec<InventoryItem> {
        let mut items = self.store.inventory.all();
        items.sort_by_key(|i| i.id);
        items
    }

    pub fn get(&self, id: i64) -> Result<InventoryItem, ServiceError> {
        self.store
            .inventory
            .get(id)
            .ok_or_else(|| ServiceError::NotFound(format!("Inventory item {} not found", id)))
    }

    /// Case-insensitive substring search over item names.
    pub fn search(&self, query: &str) -> Vec<InventoryItem> {
        let needle = query.to_lowercase();
        let mut items = self
            .store
            .inventory
            .filter(|i| i.name.to_lowercase().contains(&needle));
        items.sort_by_key(|i| i.id);
        items
    }

    pub fn low_stock(&self) -> Vec<InventoryItem> {
        let mut items = self.store.inventory.filter(InventoryItem::is_low_stock);
        items.sort_by_key(|i| i.id);
        items
    }

    /// Creates an item. A positive cost on a positive starting quantity books
    /// an inventory expense of `cost × quantity` as a side effect.
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub fn create(
        &self,
        request: CreateInventoryItemRequest,
        user_id: Option<i64>,
    ) -> Result<Mutated<InventoryItem>, ServiceError> {
        request.validate()?;

        if request.quantity < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Quantity must not be negative".to_string(),
            ));
        }

        let item = self.store.inventory.insert(|id| InventoryItem {
            id,
            name: request.name.clone(),
            quantity: request.quantity,
            unit: request.unit.clone(),
            alert_threshold: request.alert_threshold,
            cost: request.cost,
        });
        info!(inventory_item_id = item.id, "inventory item created");

        let mut effects = Vec::new();
        if let Some(cost) = item.cost {
            if cost > Decimal::ZERO && item.quantity > Decimal::ZERO {
                effects.push(SideEffect::RecordInventoryExpense {
                    item_name: item.name.clone(),
                    amount: cost * item.quantity,
                    user_id,
                });
            }
        }
        let warnings = apply_effects(&self.store, effects);
        Ok(Mutated {
            value: item,
            warnings,
        })
    }

    /// Updates an item. A strict quantity increase on an item with a positive
    /// cost books an expense of `cost × increase`; decreases book nothing.
    #[instrument(skip(self, request))]
    pub fn update(
        &self,
        id: i64,
        request: UpdateInventoryItemRequest,
        user_id: Option<i64>,
    ) -> Result<Mutated<InventoryItem>, ServiceError> {
        request.validate()?;

        if let Some(quantity) = request.quantity {
            if quantity < Decimal::ZERO {
                return Err(ServiceError::ValidationError(
                    "Quantity must not be negative".to_string(),
                ));
            }
        }

        let before = self.get(id)?;
        let updated = self
            .store
            .inventory
            .update(id, |item| {
                if let Some(name) = &request.name {
                    item.name = name.clone();
                }
                if let Some(quantity) = request.quantity {
                    item.quantity = quantity;
                }
                if let Some(unit) = &request.unit {
                    item.unit = unit.clone();
                }
                if request.alert_threshold.is_some() {
                    item.alert_threshold = request.alert_threshold;
                }
                if request.cost.is_some() {
                    item.cost = request.cost;
                }
            })
            .ok_or_else(|| ServiceError::NotFound(format!("Inventory item {} not found", id)))?;

        let mut effects = Vec::new();
        if let Some(cost) = updated.cost {
            let increase = updated.quantity - before.quantity;
            if cost > Decimal::ZERO && increase > Decimal::ZERO {
                effects.push(SideEffect::RecordInventoryExpense {
                    item_name: updated.name.clone(),
                    amount: cost * increase,
                    user_id,
                });
            }
        }
        let warnings = apply_effects(&self.store, effects);
        Ok(Mutated {
            value: updated,
            warnings,
        })
    }

    #[instrument(skip(self))]
    pub fn delete(&self, id: i64) -> Result<(), ServiceError> {
        self.store
            .inventory
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| ServiceError::NotFound(format!("Inventory item {} not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExpenseCategory;
    use rust_decimal_macros::dec;

    fn service() -> (InventoryService, Arc<RecordStore>) {
        let store = Arc::new(RecordStore::new());
        (InventoryService::new(store.clone()), store)
    }

    #[test]
    fn create_with_cost_books_expense() {
        let (svc, store) = service();
        svc.create(
            CreateInventoryItemRequest {
                name: "Milk".into(),
                quantity: dec!(5),
                unit: "litre".into(),
                alert_threshold: Some(dec!(2)),
                cost: Some(dec!(50)),
            },
            Some(1),
        )
        .unwrap();

        let expenses = store.expenses.all();
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].amount, dec!(250));
        assert_eq!(expenses[0].category, ExpenseCategory::Inventory);
        assert!(expenses[0].description.contains("Milk"));
    }

    #[test]
    fn quantity_increase_books_expense_decrease_does_not() {
        let (svc, store) = service();
        let item = svc
            .create(
                CreateInventoryItemRequest {
                    name: "Beans".into(),
                    quantity: dec!(0),
                    unit: "kg".into(),
                    alert_threshold: None,
                    cost: Some(dec!(400)),
                },
                None,
            )
            .unwrap()
            .value;
        assert!(store.expenses.is_empty());

        svc.update(
            item.id,
            UpdateInventoryItemRequest {
                name: None,
                quantity: Some(dec!(2)),
                unit: None,
                alert_threshold: None,
                cost: None,
            },
            None,
        )
        .unwrap();
        assert_eq!(store.expenses.all()[0].amount, dec!(800));

        svc.update(
            item.id,
            UpdateInventoryItemRequest {
                name: None,
                quantity: Some(dec!(1)),
                unit: None,
                alert_threshold: None,
                cost: None,
            },
            None,
        )
        .unwrap();
        assert_eq!(store.expenses.len(), 1);
    }

    #[test]
    fn low_stock_uses_threshold() {
        let (svc, _) = service();
        svc.create(
            CreateInventoryItemRequest {
                name: "Sugar".into(),
                quantity: dec!(1),
                unit: "kg".into(),
                alert_threshold: Some(dec!(2)),
                cost: None,
            },
            None,
        )
        .unwrap();
        svc.create(
            CreateInventoryItemRequest {
                name: "Tea".into(),
                quantity: dec!(9),
                unit: "kg".into(),
                alert_threshold: Some(dec!(2)),
                cost: None,
            },
            None,
        )
        .unwrap();

        let low = svc.low_stock();
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].name, "Sugar");
    }

    #[test]
    fn search_is_case_insensitive() {
        let (svc, _) = service();
        svc.create(
            CreateInventoryItemRequest {
                name: "Coffee Beans".into(),
                quantity: dec!(3),
                unit: "kg".into(),
                alert_threshold: None,
                cost: None,
            },
            None,
        )
        .unwrap();
        assert_eq!(svc.search("coffee").len(), 1);
        assert_eq!(svc.search("MILK").len(), 0);
    }
}
