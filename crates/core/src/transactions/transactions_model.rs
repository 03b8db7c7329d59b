use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::utils::money::ensure_within_limit;

/// Direction of money in a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(Error::invalid_input(format!(
                "Unknown transaction type '{}'",
                other
            ))),
        }
    }
}

/// Domain model representing a recorded income or expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    pub account_book_id: String,
    /// Book name at the time of writing; kept for display.
    pub account_book_name: String,
    pub amount: Decimal,
    pub category: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub created_at: NaiveDateTime,
}

/// The account book picked in the client's selector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookSelection {
    pub key: String,
    #[serde(default)]
    pub label: Option<String>,
}

/// Create/update payload for a transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionInput {
    pub amount: Decimal,
    /// `YYYY-MM-DD` or an RFC 3339 timestamp.
    pub date: String,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub description: Option<String>,
    pub select: BookSelection,
    pub category: String,
}

impl TransactionInput {
    pub fn validate(&self) -> Result<()> {
        if self.amount <= Decimal::ZERO {
            return Err(Error::invalid_input("Transaction amount must be greater than zero"));
        }
        ensure_within_limit(self.amount, "Transaction amount")?;
        if self.category.trim().is_empty() {
            return Err(Error::invalid_input("Transaction category cannot be empty"));
        }
        if self.select.key.trim().is_empty() {
            return Err(Error::invalid_input("An account book must be selected"));
        }
        Ok(())
    }
}
