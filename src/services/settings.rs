//! Key/value settings and the reset-database operation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::{
    errors::ServiceError,
    models::{Setting, SettingType},
    store::RecordStore,
};

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpsertSettingRequest {
    #[validate(length(min = 1, message = "Setting key is required"))]
    pub key: String,
    pub value: String,
    #[serde(default = "default_value_type")]
    pub value_type: SettingType,
}

fn default_value_type() -> SettingType {
    SettingType::String
}

#[derive(Clone)]
pub struct SettingsService {
    store: Arc<RecordStore>,
}

impl SettingsService {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Vec<Setting> {
        let mut settings = self.store.settings.all();
        settings.sort_by_key(|s| s.id);
        settings
    }

    pub fn get_by_key(&self, key: &str) -> Option<Setting> {
        self.store.settings.find(|s| s.key == key)
    }

    /// Creates or replaces the setting under `key`.
    #[instrument(skip(self, request), fields(key = %request.key))]
    pub fn upsert(&self, request: UpsertSettingRequest) -> Result<Setting, ServiceError> {
        request.validate()?;

        if let Some(existing) = self.get_by_key(&request.key) {
            let updated = self
                .store
                .settings
                .update(existing.id, |setting| {
                    setting.value = request.value.clone();
                    setting.value_type = request.value_type;
                })
                .ok_or_else(|| {
                    ServiceError::InternalError("Setting vanished during upsert".to_string())
                })?;
            return Ok(updated);
        }

        let setting = self.store.settings.insert(|id| Setting {
            id,
            key: request.key.clone(),
            value: request.value.clone(),
            value_type: request.value_type,
        });
        info!(setting_id = setting.id, "setting created");
        Ok(setting)
    }

    /// Clears every collection except users and settings.
    #[instrument(skip(self))]
    pub fn reset_database(&self) {
        warn!("resetting operational data");
        self.store.reset_operational_data();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_replaces_value_under_same_id() {
        let svc = SettingsService::new(Arc::new(RecordStore::new()));
        let first = svc
            .upsert(UpsertSettingRequest {
                key: "store_name".into(),
                value: "Corner Cafe".into(),
                value_type: SettingType::String,
            })
            .unwrap();
        let second = svc
            .upsert(UpsertSettingRequest {
                key: "store_name".into(),
                value: "Corner Cafe & Bakery".into(),
                value_type: SettingType::String,
            })
            .unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(svc.list().len(), 1);
        assert_eq!(second.value, "Corner Cafe & Bakery");
    }

    #[test]
    fn reset_keeps_users_and_settings() {
        use crate::models::{Category, Role, User};
        use chrono::Utc;

        let store = Arc::new(RecordStore::new());
        store.users.insert(|id| User {
            id,
            name: "Admin".into(),
            username: "admin".into(),
            password_hash: "x".into(),
            role: Role::Admin,
            active: true,
            created_at: Utc::now(),
        });
        store.categories.insert(|id| Category {
            id,
            name: "Snacks".into(),
            description: None,
        });

        let svc = SettingsService::new(store.clone());
        svc.upsert(UpsertSettingRequest {
            key: "tax_label".into(),
            value: "GST".into(),
            value_type: SettingType::String,
        })
        .unwrap();
        svc.reset_database();

        assert_eq!(store.users.len(), 1);
        assert_eq!(store.settings.len(), 1);
        assert!(store.categories.is_empty());
    }
}
