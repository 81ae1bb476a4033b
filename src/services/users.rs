//! Authentication and user management service

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{CreateUser, Requester, Role, User, UserClaims},
    repository::UserStore,
};

#[derive(Clone)]
pub struct UsersService {
    users: Arc<dyn UserStore>,
    config: AuthConfig,
}

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

fn verify_password(user: &User, password: &str) -> AppResult<bool> {
    let parsed = PasswordHash::new(&user.password_hash)
        .map_err(|e| AppError::Internal(format!("Invalid password hash for user {}: {}", user.id, e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

impl UsersService {
    pub fn new(users: Arc<dyn UserStore>, config: AuthConfig) -> Self {
        Self { users, config }
    }

    pub fn token_lifetime_seconds(&self) -> i64 {
        self.config.jwt_expiration_hours as i64 * 3600
    }

    /// Authenticate user by email and password and return a JWT token
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<(String, User)> {
        let invalid = || AppError::Authentication("Invalid email or password".to_string());

        let user = self.users.get_by_email(email).await?.ok_or_else(invalid)?;
        if !verify_password(&user, password)? {
            tracing::warn!(user_id = user.id, "Failed login attempt");
            return Err(invalid());
        }

        let token = UserClaims::new(&user, self.config.jwt_expiration_hours)
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        Ok((token, user))
    }

    pub async fn get_by_id(&self, id: i64, requester: &Requester) -> AppResult<User> {
        requester.ensure_can_access(id)?;
        self.users
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    pub async fn create(&self, data: &CreateUser, requester: &Requester) -> AppResult<User> {
        requester.require_admin()?;

        if self.users.get_by_email(&data.email).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Email {} is already registered",
                data.email
            )));
        }

        let hash = hash_password(&data.password)?;
        let user = self
            .users
            .create(&data.name, &data.email, &hash, data.role.unwrap_or(Role::User))
            .await?;
        tracing::info!(user_id = user.id, role = %user.role, "User created");
        Ok(user)
    }

    /// Create the configured administrator when no user exists yet
    pub async fn ensure_bootstrap_admin(&self) -> AppResult<Option<User>> {
        let (Some(email), Some(password)) = (
            self.config.bootstrap_admin_email.as_deref(),
            self.config.bootstrap_admin_password.as_deref(),
        ) else {
            return Ok(None);
        };

        if self.users.count().await? > 0 {
            return Ok(None);
        }

        let name = self
            .config
            .bootstrap_admin_name
            .as_deref()
            .unwrap_or("Administrator");
        let hash = hash_password(password)?;
        let admin = self.users.create(name, email, &hash, Role::Admin).await?;
        tracing::info!(user_id = admin.id, "Bootstrap administrator created");
        Ok(Some(admin))
    }
}
