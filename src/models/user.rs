use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Per-route access level. Gates are enforced at the route boundary, not on
/// the data itself: a staff user allowed to call an endpoint sees the same
/// records as an admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Staff,
    Cashier,
}

impl Role {
    /// Managers and admins share most back-office routes.
    pub fn is_managerial(self) -> bool {
        matches!(self, Role::Admin | Role::Manager)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub username: String,
    /// Argon2 PHC string, never serialized to clients (responses use
    /// `UserResponse` which drops it).
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}
