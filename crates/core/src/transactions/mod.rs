//! Transactions module - income and expense records and their summaries.

pub mod summary;
mod transactions_model;
mod transactions_service;
mod transactions_traits;


pub use summary::{BookSummary, CategoryRatio, CategoryTotal, MonthlySummary};
pub use transactions_model::{BookSelection, Transaction, TransactionInput, TransactionType};
pub use transactions_service::TransactionService;
pub use transactions_traits::{TransactionRepositoryTrait, TransactionServiceTrait};
