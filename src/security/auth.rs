use crate::config::SecurityConfig;
use crate::db::models::user_models::{AuthToken, LoginCredentials, User, UserRole};
use crate::db::repositories::users::UsersRepository;
use crate::error::Error;
use crate::security::{password, SecurityService};
use anyhow::Result;
use chrono::Utc;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Authentication service for handling user login and registration
pub struct AuthService {
    users_repo: UsersRepository,
    security: SecurityService,
    config: SecurityConfig,
}

impl AuthService {
    /// Create a new authentication service
    pub fn new(pool: Arc<PgPool>, config: &SecurityConfig) -> Self {
        Self {
            users_repo: UsersRepository::new(pool),
            security: SecurityService::new(config.clone()),
            config: config.clone(),
        }
    }

    /// Login a user with username/password
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<(User, AuthToken)> {
        let user = self
            .users_repo
            .get_by_username(&credentials.username)
            .await?
            .ok_or_else(|| Error::Authentication("Invalid username or password".to_string()))?;

        if !user.active {
            return Err(Error::Authentication("User account is inactive".to_string()).into());
        }

        let valid = password::verify_password(&credentials.password, &user.password_hash)?;

        if !valid {
            return Err(Error::Authentication("Invalid username or password".to_string()).into());
        }

        self.users_repo.update_last_login(&user.id).await?;

        let token = self.security.generate_token(&user)?;

        info!("User logged in: {}", user.username);

        Ok((user, token))
    }

    /// Register a new resident account
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        display_name: Option<String>,
    ) -> Result<User> {
        if self.users_repo.get_by_username(username).await?.is_some() {
            return Err(Error::Conflict("Username already exists".to_string()).into());
        }

        if self.users_repo.get_by_email(email).await?.is_some() {
            return Err(Error::Conflict("Email already exists".to_string()).into());
        }

        let password_hash = password::hash_password(password, &self.config)?;

        // Admins are provisioned directly in the database; everyone who
        // signs up is a resident.
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
            display_name,
            role: UserRole::Resident,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            last_login: None,
            active: true,
        };

        let created_user = self.users_repo.create(&user).await?;

        info!("New user registered: {}", username);

        Ok(created_user)
    }

    /// Fetch the user row behind an authenticated caller
    pub async fn current_user(&self, user_id: &Uuid) -> Result<User> {
        self.users_repo
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| Error::NotFound("User not found".to_string()).into())
    }
}
