//! Categories and menu items.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use validator::Validate;

use crate::{
    errors::ServiceError,
    models::{Category, MenuItem},
    store::RecordStore,
};

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, message = "Category name is required"))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 1, message = "Category name must not be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateMenuItemRequest {
    #[validate(length(min = 1, message = "Menu item name is required"))]
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category_id: Option<i64>,
    #[serde(default)]
    pub tax_rate: Option<Decimal>,
    #[serde(default = "default_available")]
    pub available: bool,
    pub stock_quantity: Option<i32>,
}

fn default_available() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpdateMenuItemRequest {
    #[validate(length(min = 1, message = "Menu item name must not be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub category_id: Option<i64>,
    pub tax_rate: Option<Decimal>,
    pub available: Option<bool>,
    pub stock_quantity: Option<i32>,
}

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<RecordStore>,
}

impl CatalogService {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }

    pub fn list_categories(&self) -> Vec<Category> {
        let mut categories = self.store.categories.all();
        categories.sort_by_key(|c| c.id);
        categories
    }

    pub fn get_category(&self, id: i64) -> Result<Category, ServiceError> {
        self.store
            .categories
            .get(id)
            .ok_or_else(|| ServiceError::NotFound(format!("Category {} not found", id)))
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub fn create_category(&self, request: CreateCategoryRequest) -> Result<Category, ServiceError> {
        request.validate()?;

        if self
            .store
            .categories
            .find(|c| c.name.eq_ignore_ascii_case(&request.name))
            .is_some()
        {
            return Err(ServiceError::Conflict(format!(
                "Category '{}' already exists",
                request.name
            )));
        }

        let category = self.store.categories.insert(|id| Category {
            id,
            name: request.name.clone(),
            description: request.description.clone(),
        });
        info!(category_id = category.id, "category created");
        Ok(category)
    }

    #[instrument(skip(self, request))]
    pub fn update_category(
        &self,
        id: i64,
        request: UpdateCategoryRequest,
    ) -> Result<Category, ServiceError> {
        request.validate()?;

        if let Some(name) = &request.name {
            if self
                .store
                .categories
                .find(|c| c.id != id && c.name.eq_ignore_ascii_case(name))
                .is_some()
            {
                return Err(ServiceError::Conflict(format!(
                    "Category '{}' already exists",
                    name
                )));
            }
        }

        self.store
            .categories
            .update(id, |category| {
                if let Some(name) = &request.name {
                    category.name = name.clone();
                }
                if request.description.is_some() {
                    category.description = request.description.clone();
                }
            })
            .ok_or_else(|| ServiceError::NotFound(format!("Category {} not found", id)))
    }

    /// Deletes a category. Menu items pointing at it keep their `category_id`;
    /// lookups treat the dangling reference as uncategorized.
    #[instrument(skip(self))]
    pub fn delete_category(&self, id: i64) -> Result<(), ServiceError> {
        self.store
            .categories
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| ServiceError::NotFound(format!("Category {} not found", id)))
    }

    pub fn list_menu_items(&self) -> Vec<MenuItem> {
        let mut items = self.store.menu_items.all();
        items.sort_by_key(|i| i.id);
        items
    }

    pub fn menu_items_by_category(&self, category_id: i64) -> Vec<MenuItem> {
        let mut items = self
            .store
            .menu_items
            .filter(|i| i.category_id == Some(category_id));
        items.sort_by_key(|i| i.id);
        items
    }

    pub fn get_menu_item(&self, id: i64) -> Result<MenuItem, ServiceError> {
        self.store
            .menu_items
            .get(id)
            .ok_or_else(|| ServiceError::NotFound(format!("Menu item {} not found", id)))
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub fn create_menu_item(&self, request: CreateMenuItemRequest) -> Result<MenuItem, ServiceError> {
        request.validate()?;

        if request.price < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Price must not be negative".to_string(),
            ));
        }
        if let Some(category_id) = request.category_id {
            if self.store.categories.get(category_id).is_none() {
                return Err(ServiceError::NotFound(format!(
                    "Category {} not found",
                    category_id
                )));
            }
        }

        let item = self.store.menu_items.insert(|id| MenuItem {
            id,
            name: request.name.clone(),
            description: request.description.clone(),
            price: request.price,
            category_id: request.category_id,
            tax_rate: request.tax_rate.unwrap_or(Decimal::ZERO),
            available: request.available,
            stock_quantity: request.stock_quantity,
        });
        info!(menu_item_id = item.id, "menu item created");
        Ok(item)
    }

    #[instrument(skip(self, request))]
    pub fn update_menu_item(
        &self,
        id: i64,
        request: UpdateMenuItemRequest,
    ) -> Result<MenuItem, ServiceError> {
        request.validate()?;

        if let Some(price) = request.price {
            if price < Decimal::ZERO {
                return Err(ServiceError::ValidationError(
                    "Price must not be negative".to_string(),
                ));
            }
        }
        if let Some(category_id) = request.category_id {
            if self.store.categories.get(category_id).is_none() {
                return Err(ServiceError::NotFound(format!(
                    "Category {} not found",
                    category_id
                )));
            }
        }

        self.store
            .menu_items
            .update(id, |item| {
                if let Some(name) = &request.name {
                    item.name = name.clone();
                }
                if request.description.is_some() {
                    item.description = request.description.clone();
                }
                if let Some(price) = request.price {
                    item.price = price;
                }
                if request.category_id.is_some() {
                    item.category_id = request.category_id;
                }
                if let Some(tax_rate) = request.tax_rate {
                    item.tax_rate = tax_rate;
                }
                if let Some(available) = request.available {
                    item.available = available;
                }
                if request.stock_quantity.is_some() {
                    item.stock_quantity = request.stock_quantity;
                }
            })
            .ok_or_else(|| ServiceError::NotFound(format!("Menu item {} not found", id)))
    }

    /// Deletes a menu item. Existing order lines keep their price snapshot
    /// and keep counting toward order subtotals.
    #[instrument(skip(self))]
    pub fn delete_menu_item(&self, id: i64) -> Result<(), ServiceError> {
        self.store
            .menu_items
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| ServiceError::NotFound(format!("Menu item {} not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;

    fn service() -> CatalogService {
        CatalogService::new(Arc::new(RecordStore::new()))
    }

    #[test]
    fn duplicate_category_name_conflicts_case_insensitively() {
        let svc = service();
        svc.create_category(CreateCategoryRequest {
            name: "Hot Beverages".into(),
            description: None,
        })
        .unwrap();
        let err = svc
            .create_category(CreateCategoryRequest {
                name: "hot beverages".into(),
                description: None,
            })
            .unwrap_err();
        assert_matches!(err, ServiceError::Conflict(_));
    }

    #[test]
    fn menu_item_requires_existing_category() {
        let svc = service();
        let err = svc
            .create_menu_item(CreateMenuItemRequest {
                name: "Filter Coffee".into(),
                description: None,
                price: dec!(20),
                category_id: Some(42),
                tax_rate: Some(dec!(5)),
                available: true,
                stock_quantity: Some(10),
            })
            .unwrap_err();
        assert_matches!(err, ServiceError::NotFound(_));
    }

    #[test]
    fn empty_name_fails_validation() {
        let svc = service();
        let err = svc
            .create_category(CreateCategoryRequest {
                name: "".into(),
                description: None,
            })
            .unwrap_err();
        assert_matches!(err, ServiceError::ValidationError(_));
    }

    #[test]
    fn category_delete_leaves_menu_items_in_place() {
        let svc = service();
        let cat = svc
            .create_category(CreateCategoryRequest {
                name: "Snacks".into(),
                description: None,
            })
            .unwrap();
        let item = svc
            .create_menu_item(CreateMenuItemRequest {
                name: "Samosa".into(),
                description: None,
                price: dec!(15),
                category_id: Some(cat.id),
                tax_rate: None,
                available: true,
                stock_quantity: None,
            })
            .unwrap();

        svc.delete_category(cat.id).unwrap();
        let kept = svc.get_menu_item(item.id).unwrap();
        assert_eq!(kept.category_id, Some(cat.id));
    }
}
