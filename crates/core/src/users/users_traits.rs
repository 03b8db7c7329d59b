use async_trait::async_trait;
use chrono::NaiveDateTime;

use super::users_model::{LoginRequest, NewUser, PasswordChange, PasswordReset, User};
use crate::errors::Result;

/// Trait for user repository operations
#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    fn find_by_reset_token(&self, token: &str) -> Result<Option<User>>;
    fn get_by_id(&self, user_id: &str) -> Result<User>;
    async fn insert(&self, user: User) -> Result<User>;
    /// Stores a new hash and clears any pending reset token.
    async fn update_password_hash(&self, user_id: &str, password_hash: String) -> Result<()>;
    async fn set_reset_token(
        &self,
        user_id: &str,
        token: String,
        expires_at: NaiveDateTime,
    ) -> Result<()>;
    async fn update_avatar_url(&self, user_id: &str, avatar_url: String) -> Result<()>;
}

/// Delivers password reset tokens to users.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_password_reset(&self, email: &str, token: &str) -> Result<()>;
}

/// Trait for user service operations
#[async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn register(&self, new_user: NewUser) -> Result<User>;
    fn authenticate(&self, login: &LoginRequest) -> Result<User>;
    fn get_user(&self, user_id: &str) -> Result<User>;
    async fn change_password(&self, user_id: &str, change: PasswordChange) -> Result<()>;
    async fn request_password_reset(&self, email: &str) -> Result<()>;
    fn validate_reset_token(&self, token: &str) -> Result<User>;
    async fn reset_password(&self, reset: PasswordReset) -> Result<()>;
    async fn update_avatar(&self, user_id: &str, avatar_url: String) -> Result<User>;
}
