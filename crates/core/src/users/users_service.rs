use std::sync::Arc;

use chrono::{Duration, Utc};
use log::{debug, info};
use uuid::Uuid;

use super::users_model::{
    normalize_email, validate_password, LoginRequest, NewUser, PasswordChange, PasswordHasher,
    PasswordReset, User,
};
use super::users_traits::{Mailer, UserRepositoryTrait, UserServiceTrait};
use crate::constants::RESET_TOKEN_TTL_MINUTES;
use crate::errors::{DatabaseError, Error, Result};

const USER_EXISTS: &str = "User already exists";
const BAD_CREDENTIALS: &str = "Wrong email or password";
const BAD_RESET_TOKEN: &str = "Invalid or expired token";

/// Service for registration, login, password changes and profiles.
pub struct UserService {
    repository: Arc<dyn UserRepositoryTrait>,
    hasher: Arc<dyn PasswordHasher>,
    mailer: Arc<dyn Mailer>,
}

impl UserService {
    pub fn new(
        repository: Arc<dyn UserRepositoryTrait>,
        hasher: Arc<dyn PasswordHasher>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            repository,
            hasher,
            mailer,
        }
    }
}

#[async_trait::async_trait]
impl UserServiceTrait for UserService {
    async fn register(&self, new_user: NewUser) -> Result<User> {
        new_user.validate()?;
        let email = normalize_email(&new_user.email);
        if self.repository.find_by_email(&email)?.is_some() {
            return Err(Error::ConstraintViolation(USER_EXISTS.to_string()));
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            nickname: new_user.nickname.trim().to_string(),
            email,
            password_hash: self.hasher.hash(&new_user.password)?,
            avatar_url: None,
            reset_token: None,
            reset_token_expiration: None,
            created_at: Utc::now().naive_utc(),
        };

        // A concurrent registration can still win the race to the unique index.
        let user = self.repository.insert(user).await.map_err(|e| match e {
            Error::Database(DatabaseError::UniqueViolation(_)) => {
                Error::ConstraintViolation(USER_EXISTS.to_string())
            }
            other => other,
        })?;
        info!("Registered user {}", user.id);
        Ok(user)
    }

    fn authenticate(&self, login: &LoginRequest) -> Result<User> {
        let email = normalize_email(&login.username);
        let Some(user) = self.repository.find_by_email(&email)? else {
            debug!("Login attempt for unknown user");
            return Err(Error::Unauthorized(BAD_CREDENTIALS.to_string()));
        };
        if !self.hasher.verify(&login.password, &user.password_hash)? {
            debug!("Wrong password for user {}", user.id);
            return Err(Error::Unauthorized(BAD_CREDENTIALS.to_string()));
        }
        Ok(user)
    }

    fn get_user(&self, user_id: &str) -> Result<User> {
        self.repository.get_by_id(user_id)
    }

    async fn change_password(&self, user_id: &str, change: PasswordChange) -> Result<()> {
        let user = self.repository.get_by_id(user_id)?;
        if !self.hasher.verify(&change.old_password, &user.password_hash)? {
            return Err(Error::Unauthorized("Incorrect old password".to_string()));
        }
        validate_password(&change.new_password)?;
        let password_hash = self.hasher.hash(&change.new_password)?;
        self.repository
            .update_password_hash(user_id, password_hash)
            .await?;
        info!("Password updated for user {}", user_id);
        Ok(())
    }

    async fn request_password_reset(&self, email: &str) -> Result<()> {
        let email = normalize_email(email);
        let Some(user) = self.repository.find_by_email(&email)? else {
            return Err(Error::Unauthorized("User not found".to_string()));
        };

        let token = Uuid::new_v4().simple().to_string();
        let expires_at = Utc::now().naive_utc() + Duration::minutes(RESET_TOKEN_TTL_MINUTES);
        self.repository
            .set_reset_token(&user.id, token.clone(), expires_at)
            .await?;
        self.mailer.send_password_reset(&user.email, &token).await?;
        info!("Password reset requested for user {}", user.id);
        Ok(())
    }

    fn validate_reset_token(&self, token: &str) -> Result<User> {
        let now = Utc::now().naive_utc();
        self.repository
            .find_by_reset_token(token)?
            .filter(|user| user.accepts_reset_token(token, now))
            .ok_or_else(|| Error::Unauthorized(BAD_RESET_TOKEN.to_string()))
    }

    async fn reset_password(&self, reset: PasswordReset) -> Result<()> {
        let user = self.validate_reset_token(&reset.token)?;
        validate_password(&reset.new_password)?;
        let password_hash = self.hasher.hash(&reset.new_password)?;
        self.repository
            .update_password_hash(&user.id, password_hash)
            .await?;
        info!("Password reset for user {}", user.id);
        Ok(())
    }

    async fn update_avatar(&self, user_id: &str, avatar_url: String) -> Result<User> {
        self.repository.update_avatar_url(user_id, avatar_url).await?;
        debug!("Avatar updated for user {}", user_id);
        self.repository.get_by_id(user_id)
    }
}
