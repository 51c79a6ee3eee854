use serde::{Deserialize, Serialize};

/// A physical dining table. Occupancy changes only through the table
/// endpoints and order creation; completing an order does not release it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTable {
    pub id: i64,
    pub name: String,
    pub capacity: Option<i32>,
    pub occupied: bool,
}
