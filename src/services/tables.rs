//! Dining tables.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use validator::Validate;

use crate::{errors::ServiceError, models::DiningTable, store::RecordStore};

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateTableRequest {
    #[validate(length(min = 1, message = "Table name is required"))]
    pub name: String,
    pub capacity: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpdateTableRequest {
    #[validate(length(min = 1, message = "Table name must not be empty"))]
    pub name: Option<String>,
    pub capacity: Option<i32>,
    pub occupied: Option<bool>,
}

#[derive(Clone)]
pub struct TableService {
    store: Arc<RecordStore>,
}

impl TableService {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Vec<DiningTable> {
        let mut tables = self.store.tables.all();
        tables.sort_by_key(|t| t.id);
        tables
    }

    pub fn get(&self, id: i64) -> Result<DiningTable, ServiceError> {
        self.store
            .tables
            .get(id)
            .ok_or_else(|| ServiceError::NotFound(format!("Table {} not found", id)))
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub fn create(&self, request: CreateTableRequest) -> Result<DiningTable, ServiceError> {
        request.validate()?;

        let table = self.store.tables.insert(|id| DiningTable {
            id,
            name: request.name.clone(),
            capacity: request.capacity,
            occupied: false,
        });
        info!(table_id = table.id, "table created");
        Ok(table)
    }

    #[instrument(skip(self, request))]
    pub fn update(&self, id: i64, request: UpdateTableRequest) -> Result<DiningTable, ServiceError> {
        request.validate()?;

        self.store
            .tables
            .update(id, |table| {
                if let Some(name) = &request.name {
                    table.name = name.clone();
                }
                if request.capacity.is_some() {
                    table.capacity = request.capacity;
                }
                if let Some(occupied) = request.occupied {
                    table.occupied = occupied;
                }
            })
            .ok_or_else(|| ServiceError::NotFound(format!("Table {} not found", id)))
    }

    #[instrument(skip(self))]
    pub fn delete(&self, id: i64) -> Result<(), ServiceError> {
        self.store
            .tables
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| ServiceError::NotFound(format!("Table {} not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn new_tables_start_free() {
        let svc = TableService::new(Arc::new(RecordStore::new()));
        let table = svc
            .create(CreateTableRequest {
                name: "T1".into(),
                capacity: Some(4),
            })
            .unwrap();
        assert!(!table.occupied);
    }

    #[test]
    fn occupancy_toggles_through_update() {
        let svc = TableService::new(Arc::new(RecordStore::new()));
        let table = svc
            .create(CreateTableRequest {
                name: "T1".into(),
                capacity: None,
            })
            .unwrap();
        let updated = svc
            .update(
                table.id,
                UpdateTableRequest {
                    name: None,
                    capacity: None,
                    occupied: Some(true),
                },
            )
            .unwrap();
        assert!(updated.occupied);
    }

    #[test]
    fn unknown_table_is_not_found() {
        let svc = TableService::new(Arc::new(RecordStore::new()));
        assert_matches!(svc.get(9).unwrap_err(), ServiceError::NotFound(_));
    }
}
