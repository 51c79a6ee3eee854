//! First-run seeding: an admin account and a small starter catalog so a
//! fresh instance is usable immediately.

use chrono::Utc;
use rust_decimal_macros::dec;
use tracing::{info, instrument};

use crate::auth::hash_password;
use crate::config::AppConfig;
use crate::errors::ServiceError;
use crate::models::{Category, DiningTable, MenuItem, Role, Setting, SettingType, User};
use crate::store::RecordStore;

/// Seeds the store when it has no users yet. Idempotent across restarts of
/// a persistent deployment; a no-op when any user already exists.
#[instrument(skip(store, config))]
pub fn seed_if_empty(store: &RecordStore, config: &AppConfig) -> Result<(), ServiceError> {
    if !store.users.is_empty() {
        return Ok(());
    }

    let password_hash = hash_password(&config.seed_admin_password)?;
    let admin = store.users.insert(|id| User {
        id,
        name: "Administrator".into(),
        username: "admin".into(),
        password_hash,
        role: Role::Admin,
        active: true,
        created_at: Utc::now(),
    });

    let beverages = store.categories.insert(|id| Category {
        id,
        name: "Hot Beverages".into(),
        description: Some("Coffee and tea".into()),
    });
    let snacks = store.categories.insert(|id| Category {
        id,
        name: "Snacks".into(),
        description: Some("Savory items".into()),
    });

    store.menu_items.insert(|id| MenuItem {
        id,
        name: "Filter Coffee".into(),
        description: None,
        price: dec!(20),
        category_id: Some(beverages.id),
        tax_rate: dec!(5),
        available: true,
        stock_quantity: None,
    });
    store.menu_items.insert(|id| MenuItem {
        id,
        name: "Samosa".into(),
        description: None,
        price: dec!(15),
        category_id: Some(snacks.id),
        tax_rate: dec!(5),
        available: true,
        stock_quantity: None,
    });

    for n in 1..=4 {
        store.tables.insert(|id| DiningTable {
            id,
            name: format!("T{}", n),
            capacity: Some(4),
            occupied: false,
        });
    }

    store.settings.insert(|id| Setting {
        id,
        key: "store_name".into(),
        value: "Corner Cafe".into(),
        value_type: SettingType::String,
    });

    info!(admin_id = admin.id, "seeded initial admin and starter catalog");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AppConfig {
        serde_json::from_value(serde_json::json!({
            "jwt_secret": "test_secret_key_that_is_long_enough_for_hs256"
        }))
        .unwrap()
    }

    #[test]
    fn seeds_once() {
        let store = RecordStore::new();
        seed_if_empty(&store, &config()).unwrap();
        let users = store.users.len();
        let tables = store.tables.len();

        seed_if_empty(&store, &config()).unwrap();
        assert_eq!(store.users.len(), users);
        assert_eq!(store.tables.len(), tables);
        assert_eq!(tables, 4);
    }

    #[test]
    fn admin_can_log_in_with_configured_password() {
        use crate::auth::verify_password;

        let store = RecordStore::new();
        seed_if_empty(&store, &config()).unwrap();
        let admin = store.users.find(|u| u.username == "admin").unwrap();
        assert!(verify_password("admin123", &admin.password_hash));
        assert_eq!(admin.role, Role::Admin);
    }
}
