use async_trait::async_trait;

use super::deposit_queue::DepositQueue;
use super::savings_model::{
    Deposit, DepositConfirmation, DepositReset, NewSavingsPlan, PlanAggregate, SavingsPlan,
    SavingsPlanEdit, StatusAction,
};
use crate::errors::Result;

/// A read-compute-write step over one plan and its deposits.
///
/// Repositories run it with the plan and queue loaded inside a single write
/// transaction and persist the result only if it returns `Ok`.
pub type AggregateMutation =
    Box<dyn FnOnce(&mut SavingsPlan, &mut DepositQueue) -> Result<()> + Send + 'static>;

/// Trait for savings plan repository operations.
///
/// Every lookup is scoped to the owning user; a record owned by someone else
/// is reported as not found.
#[async_trait]
pub trait SavingsRepositoryTrait: Send + Sync {
    fn list_plans(&self, user_id: &str) -> Result<Vec<SavingsPlan>>;
    fn get_plan(&self, user_id: &str, plan_id: &str) -> Result<SavingsPlan>;
    fn list_deposits(&self, user_id: &str, plan_id: &str) -> Result<Vec<Deposit>>;
    fn get_deposit(&self, user_id: &str, deposit_id: &str) -> Result<Deposit>;
    async fn insert_plan(&self, aggregate: PlanAggregate) -> Result<PlanAggregate>;
    async fn mutate_plan(
        &self,
        user_id: &str,
        plan_id: &str,
        mutation: AggregateMutation,
    ) -> Result<PlanAggregate>;
    async fn delete_plan(&self, user_id: &str, plan_id: &str) -> Result<usize>;
}

/// Trait for savings plan service operations
#[async_trait]
pub trait SavingsServiceTrait: Send + Sync {
    fn get_plans(&self, user_id: &str) -> Result<Vec<SavingsPlan>>;
    fn get_plan(&self, user_id: &str, plan_id: &str) -> Result<SavingsPlan>;
    fn get_deposits(&self, user_id: &str, plan_id: &str) -> Result<Vec<Deposit>>;
    async fn create_plan(&self, user_id: &str, new_plan: NewSavingsPlan) -> Result<PlanAggregate>;
    async fn edit_plan(
        &self,
        user_id: &str,
        plan_id: &str,
        edit: SavingsPlanEdit,
    ) -> Result<PlanAggregate>;
    async fn change_status(
        &self,
        user_id: &str,
        plan_id: &str,
        action: StatusAction,
    ) -> Result<PlanAggregate>;
    async fn delete_plan(&self, user_id: &str, plan_id: &str) -> Result<()>;
    async fn confirm_deposit(
        &self,
        user_id: &str,
        deposit_id: &str,
        confirmation: DepositConfirmation,
    ) -> Result<PlanAggregate>;
    async fn reset_deposit(
        &self,
        user_id: &str,
        deposit_id: &str,
        reset: DepositReset,
    ) -> Result<PlanAggregate>;
}
