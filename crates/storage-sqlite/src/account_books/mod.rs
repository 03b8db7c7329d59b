//! SQLite storage implementation for account books.

mod model;
mod repository;

pub use model::AccountBookDB;
pub use repository::AccountBookRepository;
