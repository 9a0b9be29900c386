use std::sync::Arc;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use tracing::{info, warn};

use crate::domain::models::user::{NewUser, UserProfile, ADMIN_ROLE};
use crate::domain::ports::UserRepository;
use crate::error::AppError;

pub const MIN_PASSWORD_LEN: usize = 8;

pub struct AuthService {
    users: Arc<dyn UserRepository>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Unknown user and wrong password fail identically.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<UserProfile, AppError> {
        let Some(user) = self.users.find_by_username(username.trim()).await? else {
            // Spend comparable hashing time so a missing user is not observable.
            let _ = hash_password(password);
            return Err(AppError::InvalidCredentials);
        };

        if !verify_password(password, &user.password_hash) {
            return Err(AppError::InvalidCredentials);
        }

        info!("User logged in: {}", user.id);
        Ok(UserProfile::from(user))
    }

    pub async fn change_password(&self, user_id: i64, new_password: &str) -> Result<(), AppError> {
        if new_password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters long",
                MIN_PASSWORD_LEN
            )));
        }

        let password_hash = hash_password(new_password)?;
        if !self.users.update_password(user_id, &password_hash, Utc::now()).await? {
            return Err(AppError::NotFound("User not found".into()));
        }

        info!("Password changed for user: {}", user_id);
        Ok(())
    }

    /// Creates the default admin when no admin exists. Returns whether one
    /// was created.
    pub async fn ensure_default_admin(&self, username: &str, password: &str) -> Result<bool, AppError> {
        if self.users.count_by_role(ADMIN_ROLE).await? > 0 {
            return Ok(false);
        }

        let admin = NewUser {
            username: username.to_string(),
            password_hash: hash_password(password)?,
            role: ADMIN_ROLE.to_string(),
            name: Some("Administrator".to_string()),
            must_change_password: true,
        };
        let created = self.users.create(&admin).await?;

        warn!(
            "Provisioned default admin '{}' (ID: {}) with the documented bootstrap password; rotate it on first login",
            created.username, created.id
        );
        Ok(true)
    }
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::InternalWithMsg(format!("Password hashing failed: {}", e)))
}

fn verify_password(password: &str, password_hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(password_hash) else {
        warn!("Stored password hash is not a valid PHC string");
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}
