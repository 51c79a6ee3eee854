//! Session authentication: HS256 JWT access tokens over argon2 password
//! hashes, with a small jti blacklist so logout actually invalidates tokens.

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::{
    errors::ServiceError,
    models::{Role, User},
    store::RecordStore,
    AppState,
};

/// Claim structure for access tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id.
    pub sub: String,
    pub name: String,
    pub username: String,
    pub role: Role,
    /// Unique token id, used by the logout blacklist.
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

/// Authenticated user data extracted from a validated token.
#[derive(Debug, Clone, Serialize)]
pub struct AuthUser {
    pub user_id: i64,
    pub name: String,
    pub username: String,
    pub role: Role,
    #[serde(skip)]
    pub token_id: String,
}

impl AuthUser {
    /// Route gate: the caller must hold one of `roles`.
    pub fn require_role(&self, roles: &[Role]) -> Result<(), ServiceError> {
        if roles.contains(&self.role) {
            Ok(())
        } else {
            Err(ServiceError::Forbidden(
                "Insufficient privileges".to_string(),
            ))
        }
    }

    /// Gate for resources a user may touch for themselves but managers may
    /// touch for anyone (shift lists, clock-out).
    pub fn can_act_for(&self, user_id: i64) -> bool {
        self.user_id == user_id || self.role.is_managerial()
    }
}

#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub access_token_expiration: ChronoDuration,
}

/// Issues and validates tokens and checks credentials against the user repo.
pub struct AuthService {
    config: AuthConfig,
    store: Arc<RecordStore>,
    blacklisted_jtis: RwLock<HashSet<String>>,
}

impl AuthService {
    pub fn new(config: AuthConfig, store: Arc<RecordStore>) -> Self {
        Self {
            config,
            store,
            blacklisted_jtis: RwLock::new(HashSet::new()),
        }
    }

    /// Verifies a username/password pair and returns the matching user.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<User, ServiceError> {
        let user = self
            .store
            .users
            .find(|u| u.username == username)
            .ok_or_else(|| ServiceError::Unauthorized("Incorrect username".to_string()))?;

        if !verify_password(password, &user.password_hash) {
            return Err(ServiceError::Unauthorized("Incorrect password".to_string()));
        }
        if !user.active {
            return Err(ServiceError::Unauthorized(
                "User account is inactive".to_string(),
            ));
        }
        Ok(user)
    }

    /// Generates a signed access token for a user.
    pub fn generate_token(&self, user: &User) -> Result<String, ServiceError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            name: user.name.clone(),
            username: user.username.clone(),
            role: user.role,
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + self.config.access_token_expiration).timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| ServiceError::InternalError(format!("Token encoding failed: {}", e)))
    }

    /// Validates a token and resolves it into an `AuthUser`.
    pub fn validate_token(&self, token: &str) -> Result<AuthUser, ServiceError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| ServiceError::Unauthorized(format!("Invalid token: {}", e)))?;

        let claims = data.claims;
        if self
            .blacklisted_jtis
            .read()
            .expect("blacklist lock poisoned")
            .contains(&claims.jti)
        {
            return Err(ServiceError::Unauthorized("Token revoked".to_string()));
        }

        let user_id: i64 = claims
            .sub
            .parse()
            .map_err(|_| ServiceError::Unauthorized("Malformed token subject".to_string()))?;

        Ok(AuthUser {
            user_id,
            name: claims.name,
            username: claims.username,
            role: claims.role,
            token_id: claims.jti,
        })
    }

    /// Revokes a token by its jti. The blacklist is process-local and is
    /// dropped on restart, matching the session-store lifetime of the
    /// original system.
    pub fn revoke(&self, token_id: &str) {
        self.blacklisted_jtis
            .write()
            .expect("blacklist lock poisoned")
            .insert(token_id.to_string());
    }
}

/// Hashes a password with argon2 and a random salt.
pub fn hash_password(password: &str) -> Result<String, ServiceError> {
    use argon2::password_hash::{rand_core::OsRng, PasswordHasher, SaltString};
    use argon2::Argon2;

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ServiceError::InternalError(format!("Password hashing failed: {}", e)))
}

/// Verifies a password against a stored PHC hash string.
pub fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::password_hash::{PasswordHash, PasswordVerifier};
    use argon2::Argon2;

    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            warn!("Stored password hash is malformed: {}", e);
            false
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ServiceError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ServiceError::Unauthorized("Missing authorization".to_string()))?;

        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or_else(|| ServiceError::Unauthorized("Expected bearer token".to_string()))?
            .trim();

        state.auth.validate_token(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AuthService {
        let store = Arc::new(RecordStore::new());
        store.users.insert(|id| User {
            id,
            name: "Admin".into(),
            username: "admin".into(),
            password_hash: hash_password("admin123").unwrap(),
            role: Role::Admin,
            active: true,
            created_at: Utc::now(),
        });
        AuthService::new(
            AuthConfig {
                jwt_secret: "test_secret_key_that_is_long_enough_for_hs256".into(),
                access_token_expiration: ChronoDuration::hours(1),
            },
            store,
        )
    }

    #[test]
    fn login_round_trip() {
        let auth = service();
        let user = auth.authenticate("admin", "admin123").unwrap();
        let token = auth.generate_token(&user).unwrap();
        let resolved = auth.validate_token(&token).unwrap();
        assert_eq!(resolved.user_id, user.id);
        assert_eq!(resolved.role, Role::Admin);
    }

    #[test]
    fn wrong_password_is_unauthorized() {
        let auth = service();
        let err = auth.authenticate("admin", "nope").unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));
    }

    #[test]
    fn revoked_token_is_rejected() {
        let auth = service();
        let user = auth.authenticate("admin", "admin123").unwrap();
        let token = auth.generate_token(&user).unwrap();
        let resolved = auth.validate_token(&token).unwrap();
        auth.revoke(&resolved.token_id);
        assert!(auth.validate_token(&token).is_err());
    }

    #[test]
    fn role_gate() {
        let user = AuthUser {
            user_id: 7,
            name: "S".into(),
            username: "staff".into(),
            role: Role::Staff,
            token_id: "jti".into(),
        };
        assert!(user.require_role(&[Role::Admin, Role::Manager]).is_err());
        assert!(user.require_role(&[Role::Staff]).is_ok());
        assert!(user.can_act_for(7));
        assert!(!user.can_act_for(8));
    }
}
