//! User model, login payloads and JWT claims

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::AppError;

/// Full user model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub is_active: bool,
    pub is_superuser: bool,
    pub date_joined: Option<DateTime<Utc>>,
}

/// Login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserClaims {
    /// Username
    pub sub: String,
    pub user_id: i32,
    pub is_superuser: bool,
    /// Granted permissions in `app_label.codename` form
    pub permissions: Vec<String>,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    /// Superusers hold every permission
    pub fn has_perm(&self, permission: &str) -> bool {
        self.is_superuser || self.permissions.iter().any(|p| p == permission)
    }

    pub fn require_perm(&self, permission: &str) -> Result<(), AppError> {
        if self.has_perm(permission) {
            Ok(())
        } else {
            Err(AppError::Authorization(format!(
                "Permission '{}' required",
                permission
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(is_superuser: bool, permissions: &[&str]) -> UserClaims {
        let now = Utc::now().timestamp();
        UserClaims {
            sub: "marian".to_string(),
            user_id: 4,
            is_superuser,
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
            exp: now + 3600,
            iat: now,
        }
    }

    #[test]
    fn test_permission_check() {
        let librarian = claims(false, &["catalog.can_mark_returned"]);
        assert!(librarian.has_perm("catalog.can_mark_returned"));
        assert!(!librarian.has_perm("catalog.librarian"));
        assert!(matches!(
            librarian.require_perm("catalog.librarian"),
            Err(AppError::Authorization(_))
        ));
    }

    #[test]
    fn test_superuser_has_every_permission() {
        assert!(claims(true, &[]).has_perm("catalog.librarian"));
    }

    #[test]
    fn test_token_round_trip() {
        let original = claims(false, &["catalog.librarian"]);
        let token = original.create_token("secret").unwrap();
        let parsed = UserClaims::from_token(&token, "secret").unwrap();
        assert_eq!(parsed.user_id, 4);
        assert_eq!(parsed.permissions, vec!["catalog.librarian".to_string()]);
        assert!(UserClaims::from_token(&token, "other-secret").is_err());
    }

    #[test]
    fn test_login_request_validation() {
        let request = LoginRequest {
            username: String::new(),
            password: "pw".to_string(),
        };
        assert!(request.validate().is_err());
    }
}
