use async_trait::async_trait;

use super::summary::{BookSummary, CategoryRatio, CategoryTotal, MonthlySummary};
use super::transactions_model::{Transaction, TransactionInput};
use crate::errors::Result;

/// Trait for transaction repository operations
#[async_trait]
pub trait TransactionRepositoryTrait: Send + Sync {
    /// Transactions owned by `user_id`, newest first.
    fn list(&self, user_id: &str) -> Result<Vec<Transaction>>;
    fn get(&self, user_id: &str, transaction_id: &str) -> Result<Transaction>;
    async fn insert(&self, transaction: Transaction) -> Result<Transaction>;
    async fn update(&self, transaction: Transaction) -> Result<Transaction>;
    async fn delete(&self, user_id: &str, transaction_id: &str) -> Result<usize>;
}

/// Trait for transaction and reporting service operations
#[async_trait]
pub trait TransactionServiceTrait: Send + Sync {
    fn get_transactions(&self, user_id: &str) -> Result<Vec<Transaction>>;
    async fn create_transaction(&self, user_id: &str, input: TransactionInput) -> Result<Transaction>;
    async fn update_transaction(
        &self,
        user_id: &str,
        transaction_id: &str,
        input: TransactionInput,
    ) -> Result<Transaction>;
    async fn delete_transaction(&self, user_id: &str, transaction_id: &str) -> Result<()>;

    fn account_book_summary(&self, user_id: &str) -> Result<Vec<BookSummary>>;
    fn monthly_summary(&self, user_id: &str) -> Result<Vec<MonthlySummary>>;
    fn top_categories(&self, user_id: &str) -> Result<Vec<CategoryTotal>>;
    fn category_ratio(&self, user_id: &str) -> Result<Vec<CategoryRatio>>;
}
