//! Authentication service: password check and token issuance

use std::sync::Arc;

use argon2::{
    password_hash::{PasswordHash, PasswordVerifier},
    Argon2,
};
use chrono::Utc;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{User, UserClaims},
    repository::AccountStore,
};

#[derive(Clone)]
pub struct AuthService {
    accounts: Arc<dyn AccountStore>,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(accounts: Arc<dyn AccountStore>, config: AuthConfig) -> Self {
        Self { accounts, config }
    }

    /// Authenticate a user by username and return a JWT token with its claims
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<(String, UserClaims)> {
        let user = self
            .accounts
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid username or password".to_string()))?;

        if !self.verify_password(&user, password)? {
            tracing::warn!(username, "Rejected login: bad password");
            return Err(AppError::Authentication("Invalid username or password".to_string()));
        }

        if !user.is_active {
            tracing::warn!(username, "Rejected login: inactive account");
            return Err(AppError::Authentication("Account is disabled".to_string()));
        }

        let permissions = self.accounts.permissions(user.id).await?;

        let now = Utc::now().timestamp();
        let claims = UserClaims {
            sub: user.username.clone(),
            user_id: user.id,
            is_superuser: user.is_superuser,
            permissions,
            exp: now + (self.config.jwt_expiration_hours as i64 * 3600),
            iat: now,
        };

        let token = claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        tracing::info!(user_id = user.id, "User logged in");
        Ok((token, claims))
    }

    /// Token lifetime in seconds
    pub fn expires_in(&self) -> i64 {
        self.config.jwt_expiration_hours as i64 * 3600
    }

    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password)
            .map_err(|e| AppError::Internal(format!("Invalid password hash: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}
