use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// Domain model representing an account book (a budget container).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountBook {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub tag: Option<String>,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Create/update payload for an account book.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountBookInput {
    pub name: String,
    pub tag: Option<String>,
    pub description: Option<String>,
}

impl AccountBookInput {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::invalid_input("Account book name cannot be empty"));
        }
        Ok(())
    }
}
