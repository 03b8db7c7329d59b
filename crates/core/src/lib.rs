//! Finbook Core - Domain entities, services, and traits.
//!
//! This crate contains the business logic for Finbook: savings plans and
//! their deposit schedules, account books, transactions and users.
//! It is database-agnostic and defines traits that are implemented
//! by the `storage-sqlite` crate.

pub mod account_books;
pub mod constants;
pub mod errors;
pub mod savings;
pub mod transactions;
pub mod users;
pub mod utils;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
