//! Plan ledger: derived quantities of a savings plan and the validated
//! mutations that reshape its schedule (creation, edit, lifecycle).

use chrono::{NaiveDate, NaiveDateTime};
use log::debug;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::deposit_queue::DepositQueue;
use super::period::{advance, PeriodUnit, Schedule};
use super::savings_model::{
    NewSavingsPlan, PlanAggregate, PlanStatus, SavingsPlan, SavingsPlanEdit, StatusAction,
};
use crate::errors::{Error, Result};
use crate::utils::money::{checked_sub, ensure_within_limit, floor_money, round_money};
use crate::utils::time_utils::parse_date;

/// Amount still to be saved.
pub fn remaining_amount(plan: &SavingsPlan) -> Result<Decimal> {
    checked_sub(plan.target_amount, plan.deposited_amount)
}

/// Periods still to be paid.
pub fn remaining_periods(plan: &SavingsPlan) -> u32 {
    plan.total_periods.saturating_sub(plan.completed_periods)
}

/// Even share of `remaining_amount` over `remaining_periods`, truncated to
/// money scale so the residual on the last slot is never negative. `None`
/// when no period is left to divide by.
pub fn amount_per_period(remaining_amount: Decimal, remaining_periods: u32) -> Option<Decimal> {
    if remaining_periods == 0 {
        return None;
    }
    remaining_amount
        .checked_div(Decimal::from(remaining_periods))
        .map(floor_money)
}

/// Adds one pending deposit per date, splitting `amount` evenly with the
/// rounding residual on the last one. Expects no pending deposits left.
pub fn spread_evenly(queue: &mut DepositQueue, dates: &[NaiveDate], amount: Decimal) -> Option<Decimal> {
    let per_period = amount_per_period(amount, dates.len() as u32)?;
    queue.bulk_create(dates, per_period);
    queue.settle_remainder(amount);
    Some(per_period)
}

/// Spreads the plan's remaining amount over its pending deposits.
///
/// Skipped (returns `None`) when the plan has no remaining period.
pub fn rebalance(plan: &mut SavingsPlan, queue: &mut DepositQueue) -> Result<Option<Decimal>> {
    let remaining = remaining_amount(plan)?;
    let Some(per_period) = amount_per_period(remaining, remaining_periods(plan)) else {
        return Ok(None);
    };
    queue.rebalance_pending(per_period);
    queue.settle_remainder(remaining);
    plan.amount_per_period = per_period;
    Ok(Some(per_period))
}

fn next_period(date: NaiveDate, unit: PeriodUnit) -> Result<NaiveDate> {
    advance(date, unit, 1)
        .ok_or_else(|| Error::invalid_input(format!("No {} follows {}", unit, date)))
}

/// Builds a new plan and its full pending schedule.
pub fn open_plan(user_id: &str, new_plan: NewSavingsPlan, now: NaiveDateTime) -> Result<PlanAggregate> {
    new_plan.validate()?;

    let total_periods = new_plan.total_periods.unwrap_or(0);
    let dates = Schedule::resolve(
        new_plan.start_date.as_deref(),
        new_plan.end_date.as_deref(),
        new_plan.period.as_deref(),
        new_plan.total_periods,
    )
    .require(total_periods)?;

    // The schedule resolved, so these parse.
    let start_date = parse_date(new_plan.start_date.as_deref().unwrap_or_default(), "start_date")?;
    let end_date = parse_date(new_plan.end_date.as_deref().unwrap_or_default(), "end_date")?;
    let period: PeriodUnit = new_plan.period.as_deref().unwrap_or_default().parse()?;

    let plan_id = Uuid::new_v4().to_string();
    let mut queue = DepositQueue::new(&plan_id, user_id, Vec::new());
    let per_period = spread_evenly(&mut queue, &dates, new_plan.amount)
        .ok_or_else(|| Error::invalid_input("Plan needs at least one period"))?;

    if let Some(client_value) = new_plan.amount_per_period {
        if round_money(client_value) != per_period {
            debug!(
                "Client amountPerPeriod {} differs from derived {}; using derived value",
                client_value, per_period
            );
        }
    }

    let plan = SavingsPlan {
        id: plan_id,
        user_id: user_id.to_string(),
        name: new_plan.name.trim().to_string(),
        description: new_plan.description,
        start_date,
        end_date,
        target_amount: new_plan.amount,
        period,
        total_periods,
        completed_periods: 0,
        amount_per_period: per_period,
        deposited_amount: Decimal::ZERO,
        status: PlanStatus::Active,
        created_at: now,
        updated_at: now,
    };
    let (deposits, _) = queue.into_changes();
    Ok(PlanAggregate { plan, deposits })
}

/// What an edit did to the schedule.
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    /// Target and remaining periods unchanged; no deposit was touched.
    Unchanged,
    Rescheduled {
        amount_per_period: Decimal,
        remaining_periods: u32,
    },
}

/// Applies a plan edit.
///
/// Name and description are always applied. The schedule is regenerated
/// only when the target amount or the remaining period count changes.
pub fn edit(plan: &mut SavingsPlan, queue: &mut DepositQueue, edit: &SavingsPlanEdit) -> Result<EditOutcome> {
    if let Some(name) = &edit.name {
        if name.trim().is_empty() {
            return Err(Error::invalid_input("Plan name cannot be empty"));
        }
        plan.name = name.trim().to_string();
    }
    if let Some(description) = &edit.description {
        plan.description = Some(description.clone()).filter(|d| !d.trim().is_empty());
    }

    if let Some(new_total) = edit.new_total_amount {
        ensure_within_limit(new_total, "new_total_amount")?;
    }

    let current_remaining = remaining_periods(plan);
    let new_target = edit.new_total_amount.unwrap_or(plan.target_amount);
    let new_remaining = edit.remaining_periods.unwrap_or(current_remaining);
    if new_target == plan.target_amount && new_remaining == current_remaining {
        return Ok(EditOutcome::Unchanged);
    }

    if matches!(plan.status, PlanStatus::Cancelled | PlanStatus::Completed) {
        return Err(Error::ConstraintViolation(format!(
            "Cannot reschedule a {} plan",
            plan.status
        )));
    }
    if new_remaining == 0 {
        return Err(Error::invalid_input("Remaining periods must be at least 1"));
    }
    let new_remaining_amount = checked_sub(new_target, plan.deposited_amount)?;
    if new_remaining_amount <= Decimal::ZERO {
        return Err(Error::invalid_input(format!(
            "New total amount must exceed the {} already deposited",
            plan.deposited_amount
        )));
    }

    let end_date = match edit.new_end_date.as_deref() {
        Some(raw) => parse_date(raw, "new_end_date")?,
        None => plan.end_date,
    };
    let first_due = match queue.last_completed_date() {
        Some(last) => next_period(last, plan.period)?,
        None => plan.start_date,
    };
    let dates = Schedule::from_parts(first_due, end_date, plan.period, new_remaining).require(new_remaining)?;

    queue.delete_pending();
    let per_period = spread_evenly(queue, &dates, new_remaining_amount)
        .ok_or_else(|| Error::Unexpected("Rescheduled plan has no periods".to_string()))?;

    plan.target_amount = new_target;
    plan.total_periods = plan.completed_periods + new_remaining;
    plan.end_date = end_date;
    plan.amount_per_period = per_period;

    Ok(EditOutcome::Rescheduled {
        amount_per_period: per_period,
        remaining_periods: new_remaining,
    })
}

/// Applies a lifecycle action.
///
/// Legal moves: active -> paused, paused -> active (resume),
/// active | paused -> cancelled.
pub fn set_status(
    plan: &mut SavingsPlan,
    queue: &mut DepositQueue,
    action: StatusAction,
    today: NaiveDate,
) -> Result<()> {
    match (plan.status, action) {
        (PlanStatus::Active, StatusAction::Pause) => plan.status = PlanStatus::Paused,
        (PlanStatus::Paused, StatusAction::Resume) => resume(plan, queue, today)?,
        (PlanStatus::Active | PlanStatus::Paused, StatusAction::Terminate) => {
            plan.status = PlanStatus::Cancelled
        }
        (status, action) => {
            return Err(Error::ConstraintViolation(format!(
                "Cannot {} a {} plan",
                action.as_str(),
                status
            )))
        }
    }
    Ok(())
}

/// Regenerates the pending tail starting today and re-activates the plan.
fn resume(plan: &mut SavingsPlan, queue: &mut DepositQueue, today: NaiveDate) -> Result<()> {
    let periods = remaining_periods(plan);
    let remaining = remaining_amount(plan)?;
    queue.delete_pending();

    if periods > 0 {
        let window_end = advance(today, plan.period, periods)
            .ok_or_else(|| Error::invalid_input("Resumed schedule runs past the supported date range"))?;
        let dates = Schedule::from_parts(today, window_end, plan.period, periods).require(periods)?;
        if let Some(per_period) = spread_evenly(queue, &dates, remaining) {
            plan.amount_per_period = per_period;
        }
        if let Some(last) = dates.last() {
            plan.end_date = *last;
        }
    }

    plan.status = PlanStatus::Active;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::savings::savings_model::{Deposit, DepositStatus};
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn now() -> NaiveDateTime {
        d(2024, 1, 1).and_hms_opt(9, 0, 0).unwrap()
    }

    fn new_plan(amount: Decimal, period: &str, total: u32, start: &str, end: &str) -> NewSavingsPlan {
        NewSavingsPlan {
            name: "Holiday".to_string(),
            description: Some("Lisbon".to_string()),
            start_date: Some(start.to_string()),
            end_date: Some(end.to_string()),
            amount,
            period: Some(period.to_string()),
            total_periods: Some(total),
            amount_per_period: None,
        }
    }

    fn opened(amount: Decimal, total: u32) -> (SavingsPlan, DepositQueue) {
        let agg = open_plan(
            "user-1",
            new_plan(amount, "month", total, "2024-01-01", "2026-12-31"),
            now(),
        )
        .unwrap();
        let queue = DepositQueue::new(&agg.plan.id, "user-1", agg.deposits);
        (agg.plan, queue)
    }

    fn pending_amounts(queue: &DepositQueue) -> Vec<Decimal> {
        queue.pending().map(|d| d.deposited_amount).collect()
    }

    #[test]
    fn test_remaining_quantities() {
        let (mut plan, _) = opened(dec!(1200), 12);
        plan.completed_periods = 3;
        plan.deposited_amount = dec!(300);
        assert_eq!(remaining_amount(&plan).unwrap(), dec!(900));
        assert_eq!(remaining_periods(&plan), 9);
    }

    #[test]
    fn test_amount_per_period_guards_zero_periods() {
        assert_eq!(amount_per_period(dec!(100), 0), None);
        assert_eq!(amount_per_period(dec!(650), 6), Some(dec!(108.33)));
        assert_eq!(amount_per_period(dec!(1200), 12), Some(dec!(100)));
        assert_eq!(amount_per_period(dec!(0.05), 10), Some(dec!(0.00)));
    }

    #[test]
    fn test_open_plan_builds_full_schedule() {
        let agg = open_plan(
            "user-1",
            new_plan(dec!(1000), "month", 3, "2024-01-31", "2024-03-31"),
            now(),
        )
        .unwrap();
        assert_eq!(agg.plan.status, PlanStatus::Active);
        assert_eq!(agg.plan.total_periods, 3);
        assert_eq!(agg.plan.amount_per_period, dec!(333.33));
        assert_eq!(agg.plan.period, PeriodUnit::Month);
        let dates: Vec<NaiveDate> = agg.deposits.iter().map(|d| d.date).collect();
        assert_eq!(dates, vec![d(2024, 1, 31), d(2024, 2, 29), d(2024, 3, 31)]);
        let total: Decimal = agg.deposits.iter().map(|d| d.deposited_amount).sum();
        assert_eq!(total, dec!(1000));
        assert!(agg.deposits.iter().all(|d| d.plan_id == agg.plan.id && d.user_id == "user-1"));
    }

    #[test]
    fn test_open_plan_rejects_bad_schedule() {
        let err = open_plan(
            "user-1",
            new_plan(dec!(1000), "daily", 3, "2024-01-01", "2024-12-31"),
            now(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("unknown period unit"));

        let err = open_plan(
            "user-1",
            new_plan(dec!(1000), "month", 12, "2024-01-01", "2024-03-01"),
            now(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("3 of 12"));

        let mut missing = new_plan(dec!(1000), "month", 3, "2024-01-01", "2024-12-31");
        missing.total_periods = None;
        assert!(open_plan("user-1", missing, now()).is_err());
    }

    #[test]
    fn test_open_plan_rejects_non_positive_amount() {
        let err = open_plan(
            "user-1",
            new_plan(dec!(0), "month", 3, "2024-01-01", "2024-12-31"),
            now(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_edit_unchanged_schedule_is_noop() {
        let (mut plan, mut queue) = opened(dec!(1200), 12);
        let before = queue.deposits().to_vec();
        let outcome = edit(
            &mut plan,
            &mut queue,
            &SavingsPlanEdit {
                name: Some("Renamed".to_string()),
                new_total_amount: Some(dec!(1200)),
                remaining_periods: Some(12),
                new_end_date: Some("2030-01-01".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(outcome, EditOutcome::Unchanged);
        assert_eq!(plan.name, "Renamed");
        assert_eq!(queue.deposits(), before.as_slice());
        let (_, changes) = queue.into_changes();
        assert!(changes.is_empty());
    }

    #[test]
    fn test_edit_regenerates_after_last_completed() {
        let (mut plan, mut queue) = opened(dec!(1200), 12);
        let first = queue.deposits()[0].id.clone();
        queue.complete(&first, dec!(100)).unwrap();
        plan.completed_periods = 1;
        plan.deposited_amount = dec!(100);

        let outcome = edit(
            &mut plan,
            &mut queue,
            &SavingsPlanEdit {
                new_total_amount: Some(dec!(1500)),
                remaining_periods: Some(7),
                new_end_date: Some("2024-08-01".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(
            outcome,
            EditOutcome::Rescheduled {
                amount_per_period: dec!(200),
                remaining_periods: 7
            }
        );
        assert_eq!(plan.total_periods, 8);
        assert_eq!(plan.target_amount, dec!(1500));
        assert_eq!(plan.end_date, d(2024, 8, 1));
        assert_eq!(queue.pending_count(), 7);
        assert_eq!(queue.pending().next().unwrap().date, d(2024, 2, 1));
        assert_eq!(pending_amounts(&queue), vec![dec!(200); 7]);
        assert_eq!(queue.deposits()[0].status, DepositStatus::Completed);
    }

    #[test]
    fn test_edit_rejects_end_date_too_early() {
        let (mut plan, mut queue) = opened(dec!(1200), 12);
        let err = edit(
            &mut plan,
            &mut queue,
            &SavingsPlanEdit {
                remaining_periods: Some(6),
                new_end_date: Some("2024-03-01".to_string()),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("3 of 6"));
        assert_eq!(queue.pending_count(), 12);
    }

    #[test]
    fn test_edit_rejects_target_below_deposited() {
        let (mut plan, mut queue) = opened(dec!(1200), 12);
        plan.deposited_amount = dec!(500);
        plan.completed_periods = 5;
        let err = edit(
            &mut plan,
            &mut queue,
            &SavingsPlanEdit {
                new_total_amount: Some(dec!(400)),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_edit_rejects_target_above_money_limit() {
        let (mut plan, mut queue) = opened(dec!(1200), 12);
        let err = edit(
            &mut plan,
            &mut queue,
            &SavingsPlanEdit {
                new_total_amount: Some(Decimal::MAX),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(plan.target_amount, dec!(1200));
        assert_eq!(queue.pending_count(), 12);
    }

    #[test]
    fn test_edit_rejects_reschedule_of_completed_plan() {
        let (mut plan, mut queue) = opened(dec!(1200), 12);
        plan.status = PlanStatus::Completed;
        let err = edit(
            &mut plan,
            &mut queue,
            &SavingsPlanEdit {
                new_total_amount: Some(dec!(2000)),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, Error::ConstraintViolation(_)));
    }

    #[test]
    fn test_status_transitions() {
        let (mut plan, mut queue) = opened(dec!(1200), 12);
        let today = d(2024, 6, 15);

        set_status(&mut plan, &mut queue, StatusAction::Pause, today).unwrap();
        assert_eq!(plan.status, PlanStatus::Paused);
        assert!(set_status(&mut plan, &mut queue, StatusAction::Pause, today).is_err());

        set_status(&mut plan, &mut queue, StatusAction::Terminate, today).unwrap();
        assert_eq!(plan.status, PlanStatus::Cancelled);
        for action in [StatusAction::Pause, StatusAction::Resume, StatusAction::Terminate] {
            let err = set_status(&mut plan, &mut queue, action, today).unwrap_err();
            assert!(matches!(err, Error::ConstraintViolation(_)));
        }
    }

    #[test]
    fn test_resume_active_plan_is_rejected() {
        let (mut plan, mut queue) = opened(dec!(1200), 12);
        let err = set_status(&mut plan, &mut queue, StatusAction::Resume, d(2024, 6, 1)).unwrap_err();
        assert!(matches!(err, Error::ConstraintViolation(_)));
    }

    #[test]
    fn test_resume_regenerates_from_today() {
        let (mut plan, mut queue) = opened(dec!(1000), 10);
        let ids: Vec<String> = queue.deposits().iter().take(3).map(|d| d.id.clone()).collect();
        for id in &ids {
            queue.complete(id, dec!(100)).unwrap();
        }
        plan.completed_periods = 3;
        plan.deposited_amount = dec!(300);
        set_status(&mut plan, &mut queue, StatusAction::Pause, d(2024, 4, 2)).unwrap();

        let today = d(2024, 9, 10);
        set_status(&mut plan, &mut queue, StatusAction::Resume, today).unwrap();

        assert_eq!(plan.status, PlanStatus::Active);
        assert_eq!(queue.pending_count(), 7);
        let pending: Vec<&Deposit> = queue.pending().collect();
        assert_eq!(pending[0].date, today);
        assert_eq!(pending[6].date, d(2025, 3, 10));
        assert_eq!(plan.end_date, d(2025, 3, 10));
        assert_eq!(queue.pending_total(), dec!(700));
        assert_eq!(plan.amount_per_period, dec!(100));
        assert_eq!(queue.deposits().iter().filter(|d| !d.is_pending()).count(), 3);
    }

    #[test]
    fn test_rebalance_skips_when_no_period_left() {
        let (mut plan, mut queue) = opened(dec!(1200), 12);
        plan.completed_periods = 12;
        let before = pending_amounts(&queue);
        assert_eq!(rebalance(&mut plan, &mut queue).unwrap(), None);
        assert_eq!(pending_amounts(&queue), before);
    }
}
