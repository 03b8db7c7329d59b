//! Account books module - named containers that group transactions.

mod account_books_model;
mod account_books_service;
mod account_books_traits;

pub use account_books_model::{AccountBook, AccountBookInput};
pub use account_books_service::AccountBookService;
pub use account_books_traits::{AccountBookRepositoryTrait, AccountBookServiceTrait};
