use async_trait::async_trait;

use super::account_books_model::{AccountBook, AccountBookInput};
use crate::errors::Result;

/// Trait for account book repository operations
#[async_trait]
pub trait AccountBookRepositoryTrait: Send + Sync {
    /// Books owned by `user_id`, newest first.
    fn list(&self, user_id: &str) -> Result<Vec<AccountBook>>;
    fn get(&self, user_id: &str, book_id: &str) -> Result<AccountBook>;
    async fn insert(&self, book: AccountBook) -> Result<AccountBook>;
    async fn update(&self, book: AccountBook) -> Result<AccountBook>;
    async fn delete(&self, user_id: &str, book_id: &str) -> Result<usize>;
}

/// Trait for account book service operations
#[async_trait]
pub trait AccountBookServiceTrait: Send + Sync {
    fn get_account_books(&self, user_id: &str) -> Result<Vec<AccountBook>>;
    async fn create_account_book(&self, user_id: &str, input: AccountBookInput) -> Result<AccountBook>;
    async fn update_account_book(
        &self,
        user_id: &str,
        book_id: &str,
        input: AccountBookInput,
    ) -> Result<AccountBook>;
    async fn delete_account_book(&self, user_id: &str, book_id: &str) -> Result<()>;
}
