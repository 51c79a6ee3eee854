use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One clock-in/clock-out span. At most one shift per user may have
/// `clock_out = None` at a time, and a clock-out, once set, never changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeShift {
    pub id: i64,
    pub user_id: i64,
    pub clock_in: DateTime<Utc>,
    pub clock_out: Option<DateTime<Utc>>,
}

impl EmployeeShift {
    pub fn is_active(&self) -> bool {
        self.clock_out.is_none()
    }
}
