use std::sync::Arc;

use chrono::Utc;
use log::debug;
use uuid::Uuid;

use super::summary::{self, BookSummary, CategoryRatio, CategoryTotal, MonthlySummary};
use super::transactions_model::{Transaction, TransactionInput};
use super::transactions_traits::{TransactionRepositoryTrait, TransactionServiceTrait};
use crate::account_books::AccountBookRepositoryTrait;
use crate::constants::TOP_CATEGORIES_LIMIT;
use crate::errors::{Error, Result};
use crate::utils::time_utils::parse_day;

/// Service for transactions and the summaries built from them.
pub struct TransactionService {
    repository: Arc<dyn TransactionRepositoryTrait>,
    account_books: Arc<dyn AccountBookRepositoryTrait>,
}

impl TransactionService {
    pub fn new(
        repository: Arc<dyn TransactionRepositoryTrait>,
        account_books: Arc<dyn AccountBookRepositoryTrait>,
    ) -> Self {
        Self {
            repository,
            account_books,
        }
    }

    /// Validates the input and fills every field except identity and
    /// creation time into `target`.
    fn apply_input(&self, user_id: &str, input: TransactionInput, target: &mut Transaction) -> Result<()> {
        input.validate()?;
        let date = parse_day(&input.date, "date")?;
        // The selected book must belong to the caller.
        let book = self.account_books.get(user_id, input.select.key.trim())?;

        target.account_book_id = book.id;
        target.account_book_name = book.name;
        target.amount = input.amount;
        target.category = input.category.trim().to_string();
        target.description = input.description.filter(|d| !d.trim().is_empty());
        target.date = date;
        target.transaction_type = input.transaction_type;
        Ok(())
    }
}

#[async_trait::async_trait]
impl TransactionServiceTrait for TransactionService {
    fn get_transactions(&self, user_id: &str) -> Result<Vec<Transaction>> {
        self.repository.list(user_id)
    }

    async fn create_transaction(&self, user_id: &str, input: TransactionInput) -> Result<Transaction> {
        let now = Utc::now().naive_utc();
        let mut transaction = Transaction {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            account_book_id: String::new(),
            account_book_name: String::new(),
            amount: input.amount,
            category: String::new(),
            description: None,
            date: now.date(),
            transaction_type: input.transaction_type,
            created_at: now,
        };
        self.apply_input(user_id, input, &mut transaction)?;
        debug!(
            "Recording {} of {} in book {}",
            transaction.transaction_type, transaction.amount, transaction.account_book_id
        );
        self.repository.insert(transaction).await
    }

    async fn update_transaction(
        &self,
        user_id: &str,
        transaction_id: &str,
        input: TransactionInput,
    ) -> Result<Transaction> {
        let mut transaction = self.repository.get(user_id, transaction_id)?;
        self.apply_input(user_id, input, &mut transaction)?;
        self.repository.update(transaction).await
    }

    async fn delete_transaction(&self, user_id: &str, transaction_id: &str) -> Result<()> {
        if self.repository.delete(user_id, transaction_id).await? == 0 {
            return Err(Error::not_found(format!("Transaction {}", transaction_id)));
        }
        Ok(())
    }

    fn account_book_summary(&self, user_id: &str) -> Result<Vec<BookSummary>> {
        let books = self.account_books.list(user_id)?;
        let transactions = self.repository.list(user_id)?;
        Ok(summary::book_summaries(&books, &transactions))
    }

    fn monthly_summary(&self, user_id: &str) -> Result<Vec<MonthlySummary>> {
        Ok(summary::monthly_summaries(&self.repository.list(user_id)?))
    }

    fn top_categories(&self, user_id: &str) -> Result<Vec<CategoryTotal>> {
        Ok(summary::top_categories(
            &self.repository.list(user_id)?,
            TOP_CATEGORIES_LIMIT,
        ))
    }

    fn category_ratio(&self, user_id: &str) -> Result<Vec<CategoryRatio>> {
        Ok(summary::category_ratios(&self.repository.list(user_id)?))
    }
}
