use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ExpenseCategory {
    Inventory,
    Salary,
    Rent,
    Utilities,
    Equipment,
    Maintenance,
    Marketing,
    Other,
}

/// Either user-entered or auto-created as a side effect of an inventory
/// purchase/restock carrying a nonzero cost.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub description: String,
    pub amount: Decimal,
    pub category: ExpenseCategory,
    pub date: DateTime<Utc>,
    pub user_id: Option<i64>,
    pub notes: Option<String>,
}
