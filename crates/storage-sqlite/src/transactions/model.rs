use chrono::NaiveDateTime;
use diesel::prelude::*;

use finbook_core::transactions::Transaction;
use finbook_core::utils::money::parse_money;
use finbook_core::utils::time_utils::{format_date, parse_date};
use finbook_core::Error;

use crate::utils::corrupt_column;

/// Database model for transactions
#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct TransactionDB {
    pub id: String,
    pub user_id: String,
    pub account_book_id: String,
    pub account_book_name: String,
    pub amount: String,
    pub category: String,
    pub description: Option<String>,
    pub date: String,
    pub transaction_type: String,
    pub created_at: NaiveDateTime,
}

impl TryFrom<TransactionDB> for Transaction {
    type Error = Error;

    fn try_from(db: TransactionDB) -> Result<Self, Self::Error> {
        Ok(Transaction {
            amount: corrupt_column("amount", parse_money(&db.amount, "amount"))?,
            date: corrupt_column("date", parse_date(&db.date, "date"))?,
            transaction_type: corrupt_column("transaction_type", db.transaction_type.parse())?,
            id: db.id,
            user_id: db.user_id,
            account_book_id: db.account_book_id,
            account_book_name: db.account_book_name,
            category: db.category,
            description: db.description,
            created_at: db.created_at,
        })
    }
}

impl From<&Transaction> for TransactionDB {
    fn from(tx: &Transaction) -> Self {
        TransactionDB {
            id: tx.id.clone(),
            user_id: tx.user_id.clone(),
            account_book_id: tx.account_book_id.clone(),
            account_book_name: tx.account_book_name.clone(),
            amount: tx.amount.to_string(),
            category: tx.category.clone(),
            description: tx.description.clone(),
            date: format_date(tx.date),
            transaction_type: tx.transaction_type.as_str().to_string(),
            created_at: tx.created_at,
        }
    }
}
