use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: i64,
    pub name: String,
    pub quantity: Decimal,
    pub unit: String,
    /// At or below this quantity the item counts as low stock.
    pub alert_threshold: Option<Decimal>,
    /// Per-unit purchase cost; drives the auto-created inventory expense.
    pub cost: Option<Decimal>,
}

impl InventoryItem {
    pub fn is_low_stock(&self) -> bool {
        self.alert_threshold
            .map_or(false, |threshold| self.quantity <= threshold)
    }
}
