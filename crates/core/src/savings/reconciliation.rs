//! Deposit reconciliation.
//!
//! Confirming a deposit settles it against the plan and redistributes what
//! is left over the pending tail. Resetting a deposit undoes that. Both run
//! against a plan and queue loaded inside a single write transaction.

use log::debug;
use rust_decimal::Decimal;

use super::deposit_queue::DepositQueue;
use super::ledger::{rebalance, remaining_amount, remaining_periods};
use super::period::advance;
use super::savings_model::{PlanStatus, SavingsPlan};
use crate::errors::{Error, Result};
use crate::utils::money::{checked_add, checked_sub, ensure_amount};

/// How a confirmation changed the plan.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmationOutcome {
    /// The payment funded the rest of the plan.
    Completed { absorbed_overpayment: Decimal },
    /// The last scheduled period was underpaid; one more deposit was added.
    Extended {
        shortfall: Decimal,
        due_date: chrono::NaiveDate,
    },
    /// The remainder was spread over the pending tail.
    Rebalanced { amount_per_period: Option<Decimal> },
}

/// Confirms the pending deposit `deposit_id` as paid with `paid`.
pub fn confirm_deposit(
    plan: &mut SavingsPlan,
    queue: &mut DepositQueue,
    deposit_id: &str,
    paid: Decimal,
) -> Result<ConfirmationOutcome> {
    ensure_amount(paid, "deposited_amount")?;
    if plan.status != PlanStatus::Active {
        return Err(Error::ConstraintViolation(format!(
            "Cannot confirm deposits on a {} plan",
            plan.status
        )));
    }

    let remaining_before = remaining_amount(plan)?;
    let periods_before = remaining_periods(plan);
    let deposited = checked_add(plan.deposited_amount, paid)?;

    queue.complete(deposit_id, paid)?;
    plan.completed_periods += 1;
    plan.deposited_amount = deposited;

    if paid >= remaining_before {
        let overpayment = checked_sub(paid, remaining_before)?;
        let superseded = queue.delete_pending();
        plan.target_amount = checked_add(plan.target_amount, overpayment)?;
        plan.total_periods = plan.completed_periods;
        plan.status = PlanStatus::Completed;
        debug!(
            "Plan {} completed by deposit {} ({} superseded, overpayment {})",
            plan.id, deposit_id, superseded, overpayment
        );
        return Ok(ConfirmationOutcome::Completed {
            absorbed_overpayment: overpayment,
        });
    }

    if periods_before <= 1 {
        let shortfall = checked_sub(remaining_before, paid)?;
        let due_date = advance(plan.end_date, plan.period, 1).ok_or_else(|| {
            Error::invalid_input(format!("No {} follows {}", plan.period, plan.end_date))
        })?;
        queue.delete_pending();
        queue.bulk_create(&[due_date], shortfall);
        plan.total_periods = plan.completed_periods + 1;
        plan.end_date = due_date;
        plan.amount_per_period = shortfall;
        debug!(
            "Plan {} extended to {} for a shortfall of {}",
            plan.id, due_date, shortfall
        );
        return Ok(ConfirmationOutcome::Extended {
            shortfall,
            due_date,
        });
    }

    let amount_per_period = rebalance(plan, queue)?;
    Ok(ConfirmationOutcome::Rebalanced { amount_per_period })
}

/// Reverts the completed deposit `deposit_id` to pending and rebalances.
///
/// The deposit gets its scheduled amount back. A completed plan goes back
/// to active; paused and cancelled plans are left alone.
pub fn reset_deposit(plan: &mut SavingsPlan, queue: &mut DepositQueue, deposit_id: &str) -> Result<()> {
    if matches!(plan.status, PlanStatus::Paused | PlanStatus::Cancelled) {
        return Err(Error::ConstraintViolation(format!(
            "Cannot reset deposits on a {} plan",
            plan.status
        )));
    }

    let paid = queue.reopen(deposit_id)?;
    plan.completed_periods = plan.completed_periods.saturating_sub(1);
    plan.deposited_amount = checked_sub(plan.deposited_amount, paid)?;
    plan.status = PlanStatus::Active;

    rebalance(plan, queue)?;
    Ok(())
}
