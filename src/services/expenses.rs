//! Expense logging.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use validator::Validate;

use crate::{
    errors::ServiceError,
    models::{Expense, ExpenseCategory},
    store::RecordStore,
};

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateExpenseRequest {
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    pub amount: Decimal,
    pub category: ExpenseCategory,
    pub date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpdateExpenseRequest {
    #[validate(length(min = 1, message = "Description must not be empty"))]
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub category: Option<ExpenseCategory>,
    pub date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(Clone)]
pub struct ExpenseService {
    store: Arc<RecordStore>,
}

impl ExpenseService {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }

    /// All expenses, newest first by date.
    pub fn list(&self) -> Vec<Expense> {
        let mut expenses = self.store.expenses.all();
        expenses.sort_by(|a, b| b.date.cmp(&a.date));
        expenses
    }

    pub fn get(&self, id: i64) -> Result<Expense, ServiceError> {
        self.store
            .expenses
            .get(id)
            .ok_or_else(|| ServiceError::NotFound(format!("Expense {} not found", id)))
    }

    #[instrument(skip(self, request), fields(category = %request.category))]
    pub fn create(
        &self,
        request: CreateExpenseRequest,
        user_id: Option<i64>,
    ) -> Result<Expense, ServiceError> {
        request.validate()?;
        if request.amount <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Amount must be positive".to_string(),
            ));
        }

        let expense = self.store.expenses.insert(|id| Expense {
            id,
            description: request.description.clone(),
            amount: request.amount,
            category: request.category,
            date: request.date.unwrap_or_else(Utc::now),
            user_id,
            notes: request.notes.clone(),
        });
        info!(expense_id = expense.id, "expense recorded");
        Ok(expense)
    }

    #[instrument(skip(self, request))]
    pub fn update(&self, id: i64, request: UpdateExpenseRequest) -> Result<Expense, ServiceError> {
        request.validate()?;
        if let Some(amount) = request.amount {
            if amount <= Decimal::ZERO {
                return Err(ServiceError::ValidationError(
                    "Amount must be positive".to_string(),
                ));
            }
        }

        self.store
            .expenses
            .update(id, |expense| {
                if let Some(description) = &request.description {
                    expense.description = description.clone();
                }
                if let Some(amount) = request.amount {
                    expense.amount = amount;
                }
                if let Some(category) = request.category {
                    expense.category = category;
                }
                if let Some(date) = request.date {
                    expense.date = date;
                }
                if request.notes.is_some() {
                    expense.notes = request.notes.clone();
                }
            })
            .ok_or_else(|| ServiceError::NotFound(format!("Expense {} not found", id)))
    }

    #[instrument(skip(self))]
    pub fn delete(&self, id: i64) -> Result<(), ServiceError> {
        self.store
            .expenses
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| ServiceError::NotFound(format!("Expense {} not found", id)))
    }
}
