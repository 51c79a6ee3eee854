use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Menu category. Names are unique with case-insensitive matching; deleting a
/// category does not cascade to its menu items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category_id: Option<i64>,
    /// Tax rate in percent (e.g. `5` for 5%).
    pub tax_rate: Decimal,
    pub available: bool,
    /// `None` means stock is not tracked for this item.
    pub stock_quantity: Option<i32>,
}
