use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;

use finbook_core::transactions::{Transaction, TransactionRepositoryTrait};
use finbook_core::{Error, Result};

use super::model::TransactionDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::transactions;

/// Repository for managing transaction data in the database
pub struct TransactionRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl TransactionRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl TransactionRepositoryTrait for TransactionRepository {
    fn list(&self, user_id: &str) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;
        transactions::table
            .filter(transactions::user_id.eq(user_id))
            .order((transactions::date.desc(), transactions::created_at.desc()))
            .select(TransactionDB::as_select())
            .load::<TransactionDB>(&mut conn)
            .into_core()?
            .into_iter()
            .map(Transaction::try_from)
            .collect()
    }

    fn get(&self, user_id: &str, transaction_id: &str) -> Result<Transaction> {
        let mut conn = get_connection(&self.pool)?;
        let row = transactions::table
            .filter(transactions::id.eq(transaction_id))
            .filter(transactions::user_id.eq(user_id))
            .select(TransactionDB::as_select())
            .first::<TransactionDB>(&mut conn)
            .optional()
            .into_core()?
            .ok_or_else(|| Error::not_found(format!("Transaction {}", transaction_id)))?;
        Transaction::try_from(row)
    }

    async fn insert(&self, transaction: Transaction) -> Result<Transaction> {
        self.writer
            .exec(move |conn| -> Result<Transaction> {
                diesel::insert_into(transactions::table)
                    .values(TransactionDB::from(&transaction))
                    .execute(conn)
                    .into_core()?;
                Ok(transaction)
            })
            .await
    }

    async fn update(&self, transaction: Transaction) -> Result<Transaction> {
        self.writer
            .exec(move |conn| -> Result<Transaction> {
                let row = TransactionDB::from(&transaction);
                let updated = diesel::update(
                    transactions::table
                        .filter(transactions::id.eq(&row.id))
                        .filter(transactions::user_id.eq(&row.user_id)),
                )
                .set(&row)
                .execute(conn)
                .into_core()?;
                if updated == 0 {
                    return Err(Error::not_found(format!("Transaction {}", row.id)));
                }
                Ok(transaction)
            })
            .await
    }

    async fn delete(&self, user_id: &str, transaction_id: &str) -> Result<usize> {
        let user_id = user_id.to_string();
        let transaction_id = transaction_id.to_string();
        self.writer
            .exec(move |conn| -> Result<usize> {
                diesel::delete(
                    transactions::table
                        .filter(transactions::id.eq(transaction_id))
                        .filter(transactions::user_id.eq(user_id)),
                )
                .execute(conn)
                .into_core()
            })
            .await
    }
}
