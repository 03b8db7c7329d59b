//! SQLite storage implementation for savings plans and deposits.

mod model;
mod repository;


pub use model::{DepositDB, SavingsPlanDB};
pub use repository::SavingsRepository;
