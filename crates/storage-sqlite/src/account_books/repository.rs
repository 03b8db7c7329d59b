use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;

use finbook_core::account_books::{AccountBook, AccountBookRepositoryTrait};
use finbook_core::{Error, Result};

use super::model::AccountBookDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::account_books;

/// Repository for managing account book data in the database
pub struct AccountBookRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl AccountBookRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl AccountBookRepositoryTrait for AccountBookRepository {
    fn list(&self, user_id: &str) -> Result<Vec<AccountBook>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = account_books::table
            .filter(account_books::user_id.eq(user_id))
            .order(account_books::created_at.desc())
            .select(AccountBookDB::as_select())
            .load::<AccountBookDB>(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(AccountBook::from).collect())
    }

    fn get(&self, user_id: &str, book_id: &str) -> Result<AccountBook> {
        let mut conn = get_connection(&self.pool)?;
        account_books::table
            .filter(account_books::id.eq(book_id))
            .filter(account_books::user_id.eq(user_id))
            .select(AccountBookDB::as_select())
            .first::<AccountBookDB>(&mut conn)
            .optional()
            .into_core()?
            .map(AccountBook::from)
            .ok_or_else(|| Error::not_found(format!("Account book {}", book_id)))
    }

    async fn insert(&self, book: AccountBook) -> Result<AccountBook> {
        self.writer
            .exec(move |conn| -> Result<AccountBook> {
                let row = AccountBookDB::from(book);
                diesel::insert_into(account_books::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(row.into())
            })
            .await
    }

    async fn update(&self, book: AccountBook) -> Result<AccountBook> {
        self.writer
            .exec(move |conn| -> Result<AccountBook> {
                let row = AccountBookDB::from(book);
                let updated = diesel::update(
                    account_books::table
                        .filter(account_books::id.eq(&row.id))
                        .filter(account_books::user_id.eq(&row.user_id)),
                )
                .set(&row)
                .execute(conn)
                .into_core()?;
                if updated == 0 {
                    return Err(Error::not_found(format!("Account book {}", row.id)));
                }
                Ok(row.into())
            })
            .await
    }

    async fn delete(&self, user_id: &str, book_id: &str) -> Result<usize> {
        let user_id = user_id.to_string();
        let book_id = book_id.to_string();
        self.writer
            .exec(move |conn| -> Result<usize> {
                diesel::delete(
                    account_books::table
                        .filter(account_books::id.eq(book_id))
                        .filter(account_books::user_id.eq(user_id)),
                )
                .execute(conn)
                .into_core()
            })
            .await
    }
}
