use std::sync::Arc;

use chrono::Utc;
use log::debug;
use uuid::Uuid;

use super::account_books_model::{AccountBook, AccountBookInput};
use super::account_books_traits::{AccountBookRepositoryTrait, AccountBookServiceTrait};
use crate::errors::{Error, Result};

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Service for managing account books
pub struct AccountBookService {
    repository: Arc<dyn AccountBookRepositoryTrait>,
}

impl AccountBookService {
    pub fn new(repository: Arc<dyn AccountBookRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait::async_trait]
impl AccountBookServiceTrait for AccountBookService {
    fn get_account_books(&self, user_id: &str) -> Result<Vec<AccountBook>> {
        self.repository.list(user_id)
    }

    async fn create_account_book(&self, user_id: &str, input: AccountBookInput) -> Result<AccountBook> {
        input.validate()?;
        let now = Utc::now().naive_utc();
        let book = AccountBook {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            name: input.name.trim().to_string(),
            tag: clean(input.tag),
            description: clean(input.description),
            created_at: now,
            updated_at: now,
        };
        debug!("Creating account book {} for user {}", book.id, user_id);
        self.repository.insert(book).await
    }

    async fn update_account_book(
        &self,
        user_id: &str,
        book_id: &str,
        input: AccountBookInput,
    ) -> Result<AccountBook> {
        input.validate()?;
        let existing = self.repository.get(user_id, book_id)?;
        let book = AccountBook {
            name: input.name.trim().to_string(),
            tag: clean(input.tag),
            description: clean(input.description),
            updated_at: Utc::now().naive_utc(),
            ..existing
        };
        self.repository.update(book).await
    }

    async fn delete_account_book(&self, user_id: &str, book_id: &str) -> Result<()> {
        if self.repository.delete(user_id, book_id).await? == 0 {
            return Err(Error::not_found(format!("Account book {}", book_id)));
        }
        Ok(())
    }
}
