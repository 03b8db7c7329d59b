use std::sync::Arc;

use chrono::Utc;
use log::{debug, info};

use super::ledger;
use super::reconciliation;
use super::savings_model::{
    Deposit, DepositConfirmation, DepositReset, NewSavingsPlan, PlanAggregate, SavingsPlan,
    SavingsPlanEdit, StatusAction,
};
use super::savings_traits::{SavingsRepositoryTrait, SavingsServiceTrait};
use crate::errors::{Error, Result};
use crate::utils::time_utils::today;

/// Service for savings plans and their deposit schedules.
pub struct SavingsService {
    repository: Arc<dyn SavingsRepositoryTrait>,
}

impl SavingsService {
    pub fn new(repository: Arc<dyn SavingsRepositoryTrait>) -> Self {
        Self { repository }
    }

    /// Resolves the plan a deposit belongs to, cross-checking the plan id
    /// a client may have sent along.
    fn plan_of_deposit(
        &self,
        user_id: &str,
        deposit_id: &str,
        claimed_plan_id: Option<&str>,
    ) -> Result<String> {
        let deposit = self.repository.get_deposit(user_id, deposit_id)?;
        if let Some(claimed) = claimed_plan_id.filter(|p| !p.is_empty()) {
            if claimed != deposit.plan_id {
                return Err(Error::invalid_input(format!(
                    "Deposit {} does not belong to plan {}",
                    deposit_id, claimed
                )));
            }
        }
        Ok(deposit.plan_id)
    }
}

fn ensure_same_id(path_id: &str, body_id: Option<&str>) -> Result<()> {
    match body_id {
        Some(id) if !id.is_empty() && id != path_id => Err(Error::invalid_input(format!(
            "Body id {} does not match path id {}",
            id, path_id
        ))),
        _ => Ok(()),
    }
}

#[async_trait::async_trait]
impl SavingsServiceTrait for SavingsService {
    fn get_plans(&self, user_id: &str) -> Result<Vec<SavingsPlan>> {
        self.repository.list_plans(user_id)
    }

    fn get_plan(&self, user_id: &str, plan_id: &str) -> Result<SavingsPlan> {
        self.repository.get_plan(user_id, plan_id)
    }

    fn get_deposits(&self, user_id: &str, plan_id: &str) -> Result<Vec<Deposit>> {
        self.repository.list_deposits(user_id, plan_id)
    }

    async fn create_plan(&self, user_id: &str, new_plan: NewSavingsPlan) -> Result<PlanAggregate> {
        let aggregate = ledger::open_plan(user_id, new_plan, Utc::now().naive_utc())?;
        info!(
            "Creating savings plan {} with {} deposits of {}",
            aggregate.plan.id,
            aggregate.deposits.len(),
            aggregate.plan.amount_per_period
        );
        self.repository.insert_plan(aggregate).await
    }

    async fn edit_plan(
        &self,
        user_id: &str,
        plan_id: &str,
        edit: SavingsPlanEdit,
    ) -> Result<PlanAggregate> {
        self.repository
            .mutate_plan(
                user_id,
                plan_id,
                Box::new(move |plan, queue| {
                    let outcome = ledger::edit(plan, queue, &edit)?;
                    debug!("Edited plan {}: {:?}", plan.id, outcome);
                    Ok(())
                }),
            )
            .await
    }

    async fn change_status(
        &self,
        user_id: &str,
        plan_id: &str,
        action: StatusAction,
    ) -> Result<PlanAggregate> {
        let today = today();
        self.repository
            .mutate_plan(
                user_id,
                plan_id,
                Box::new(move |plan, queue| {
                    ledger::set_status(plan, queue, action, today)?;
                    info!("Plan {} is now {}", plan.id, plan.status);
                    Ok(())
                }),
            )
            .await
    }

    async fn delete_plan(&self, user_id: &str, plan_id: &str) -> Result<()> {
        let deleted = self.repository.delete_plan(user_id, plan_id).await?;
        if deleted == 0 {
            return Err(Error::not_found(format!("Savings plan {}", plan_id)));
        }
        Ok(())
    }

    async fn confirm_deposit(
        &self,
        user_id: &str,
        deposit_id: &str,
        confirmation: DepositConfirmation,
    ) -> Result<PlanAggregate> {
        ensure_same_id(deposit_id, confirmation.id.as_deref())?;
        let paid = confirmation.paid_amount()?;
        let plan_id = self.plan_of_deposit(user_id, deposit_id, confirmation.plan_id.as_deref())?;

        let deposit_id = deposit_id.to_string();
        self.repository
            .mutate_plan(
                user_id,
                &plan_id,
                Box::new(move |plan, queue| {
                    let outcome = reconciliation::confirm_deposit(plan, queue, &deposit_id, paid)?;
                    debug!("Confirmed deposit {} for {}: {:?}", deposit_id, paid, outcome);
                    Ok(())
                }),
            )
            .await
    }

    async fn reset_deposit(
        &self,
        user_id: &str,
        deposit_id: &str,
        reset: DepositReset,
    ) -> Result<PlanAggregate> {
        ensure_same_id(deposit_id, reset.id.as_deref())?;
        let plan_id = self.plan_of_deposit(user_id, deposit_id, reset.plan_id.as_deref())?;

        let deposit_id = deposit_id.to_string();
        self.repository
            .mutate_plan(
                user_id,
                &plan_id,
                Box::new(move |plan, queue| {
                    reconciliation::reset_deposit(plan, queue, &deposit_id)?;
                    debug!("Reset deposit {} on plan {}", deposit_id, plan.id);
                    Ok(())
                }),
            )
            .await
    }
}
