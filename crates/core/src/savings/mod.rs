//! Savings module - recurring deposit plans, their schedules and the
//! reconciliation of confirmed deposits.

mod deposit_queue;
pub mod ledger;
pub mod period;
pub mod reconciliation;
mod savings_model;
mod savings_service;
mod savings_traits;


pub use deposit_queue::DepositQueue;
pub use ledger::EditOutcome;
pub use period::{advance, generate_schedule, PeriodUnit, Schedule, ScheduleWarning};
pub use reconciliation::ConfirmationOutcome;
pub use savings_model::{
    Deposit, DepositChanges, DepositConfirmation, DepositReset, DepositStatus, NewSavingsPlan,
    PlanAggregate, PlanStatus, SavingsPlan, SavingsPlanEdit, StatusAction, StatusChange,
};
pub use savings_service::SavingsService;
pub use savings_traits::{AggregateMutation, SavingsRepositoryTrait, SavingsServiceTrait};
