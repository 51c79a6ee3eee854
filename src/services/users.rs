//! User management (admin only at the route layer).

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use validator::Validate;

use crate::{
    auth::hash_password,
    errors::ServiceError,
    models::{Role, User},
    store::RecordStore,
};

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 3, message = "Username must be at least 3 characters"))]
    pub username: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: Option<String>,
    pub role: Option<Role>,
    pub active: Option<bool>,
}

/// User shape returned to clients; carries no credential material.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub role: Role,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            username: user.username,
            role: user.role,
            active: user.active,
            created_at: user.created_at,
        }
    }
}

#[derive(Clone)]
pub struct UserService {
    store: Arc<RecordStore>,
}

impl UserService {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Vec<UserResponse> {
        let mut users = self.store.users.all();
        users.sort_by_key(|u| u.id);
        users.into_iter().map(UserResponse::from).collect()
    }

    pub fn get(&self, id: i64) -> Result<UserResponse, ServiceError> {
        self.store
            .users
            .get(id)
            .map(UserResponse::from)
            .ok_or_else(|| ServiceError::NotFound(format!("User {} not found", id)))
    }

    #[instrument(skip(self, request), fields(username = %request.username))]
    pub fn create(&self, request: CreateUserRequest) -> Result<UserResponse, ServiceError> {
        request.validate()?;

        if self
            .store
            .users
            .find(|u| u.username.eq_ignore_ascii_case(&request.username))
            .is_some()
        {
            return Err(ServiceError::Conflict(format!(
                "Username '{}' is taken",
                request.username
            )));
        }

        let password_hash = hash_password(&request.password)?;
        let user = self.store.users.insert(|id| User {
            id,
            name: request.name.clone(),
            username: request.username.clone(),
            password_hash: password_hash.clone(),
            role: request.role,
            active: true,
            created_at: Utc::now(),
        });
        info!(user_id = user.id, "user created");
        Ok(user.into())
    }

    #[instrument(skip(self, request))]
    pub fn update(&self, id: i64, request: UpdateUserRequest) -> Result<UserResponse, ServiceError> {
        request.validate()?;

        let password_hash = match &request.password {
            Some(password) => Some(hash_password(password)?),
            None => None,
        };

        self.store
            .users
            .update(id, |user| {
                if let Some(name) = &request.name {
                    user.name = name.clone();
                }
                if let Some(hash) = &password_hash {
                    user.password_hash = hash.clone();
                }
                if let Some(role) = request.role {
                    user.role = role;
                }
                if let Some(active) = request.active {
                    user.active = active;
                }
            })
            .map(UserResponse::from)
            .ok_or_else(|| ServiceError::NotFound(format!("User {} not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::verify_password;
    use assert_matches::assert_matches;

    fn service() -> (UserService, Arc<RecordStore>) {
        let store = Arc::new(RecordStore::new());
        (UserService::new(store.clone()), store)
    }

    #[test]
    fn create_hashes_the_password() {
        let (svc, store) = service();
        let user = svc
            .create(CreateUserRequest {
                name: "Asha".into(),
                username: "asha".into(),
                password: "s3cret99".into(),
                role: Role::Cashier,
            })
            .unwrap();

        let stored = store.users.get(user.id).unwrap();
        assert_ne!(stored.password_hash, "s3cret99");
        assert!(verify_password("s3cret99", &stored.password_hash));
    }

    #[test]
    fn duplicate_username_conflicts() {
        let (svc, _) = service();
        svc.create(CreateUserRequest {
            name: "Asha".into(),
            username: "asha".into(),
            password: "s3cret99".into(),
            role: Role::Staff,
        })
        .unwrap();
        let err = svc
            .create(CreateUserRequest {
                name: "Other".into(),
                username: "Asha".into(),
                password: "s3cret99".into(),
                role: Role::Staff,
            })
            .unwrap_err();
        assert_matches!(err, ServiceError::Conflict(_));
    }

    #[test]
    fn short_password_fails_validation() {
        let (svc, _) = service();
        let err = svc
            .create(CreateUserRequest {
                name: "Asha".into(),
                username: "asha".into(),
                password: "abc".into(),
                role: Role::Staff,
            })
            .unwrap_err();
        assert_matches!(err, ServiceError::ValidationError(_));
    }

    #[test]
    fn deactivation_via_update() {
        let (svc, _) = service();
        let user = svc
            .create(CreateUserRequest {
                name: "Asha".into(),
                username: "asha".into(),
                password: "s3cret99".into(),
                role: Role::Staff,
            })
            .unwrap();
        let updated = svc
            .update(
                user.id,
                UpdateUserRequest {
                    name: None,
                    password: None,
                    role: None,
                    active: Some(false),
                },
            )
            .unwrap();
        assert!(!updated.active);
    }
}
