//! Property-based tests for deposit reconciliation.
//!
//! A plan is opened with a random target and period count, then its pending
//! deposits are confirmed one by one with random over- and underpayments.

use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;

use finbook_core::savings::ledger::open_plan;
use finbook_core::savings::reconciliation::{confirm_deposit, reset_deposit};
use finbook_core::savings::{
    advance, DepositQueue, DepositStatus, NewSavingsPlan, PeriodUnit, PlanAggregate, PlanStatus,
    SavingsPlan,
};
use finbook_core::utils::money::round_money;

fn open(target_cents: i64, periods: u32) -> PlanAggregate {
    let start = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
    let end = advance(start, PeriodUnit::Week, periods).unwrap();
    open_plan(
        "user-1",
        NewSavingsPlan {
            name: "Property plan".to_string(),
            description: None,
            start_date: Some(start.format("%Y-%m-%d").to_string()),
            end_date: Some(end.format("%Y-%m-%d").to_string()),
            amount: Decimal::new(target_cents, 2),
            period: Some("week".to_string()),
            total_periods: Some(periods),
            amount_per_period: None,
        },
        Utc::now().naive_utc(),
    )
    .unwrap()
}

fn assert_balanced(plan: &SavingsPlan, queue: &DepositQueue) {
    let completed = queue
        .deposits()
        .iter()
        .filter(|d| d.status == DepositStatus::Completed)
        .count() as u32;
    assert_eq!(plan.completed_periods, completed);
    assert!(queue.pending().all(|d| d.deposited_amount >= Decimal::ZERO));
    assert_eq!(
        plan.total_periods as usize,
        completed as usize + queue.pending_count()
    );

    if plan.status == PlanStatus::Completed {
        assert_eq!(queue.pending_count(), 0);
        assert_eq!(plan.deposited_amount, plan.target_amount);
    } else {
        assert_eq!(
            queue.pending_total() + plan.deposited_amount,
            plan.target_amount
        );
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Pending plus deposited always equals the target, whatever is paid.
    #[test]
    fn confirmations_keep_the_plan_balanced(
        target_cents in 100i64..500_000,
        periods in 1u32..=24,
        payments in prop::collection::vec(1u32..=250, 1..40),
    ) {
        let PlanAggregate { mut plan, deposits } = open(target_cents, periods);
        let mut queue = DepositQueue::new(&plan.id, &plan.user_id, deposits);
        assert_balanced(&plan, &queue);

        for percent in payments {
            if plan.status == PlanStatus::Completed {
                break;
            }
            let Some(next) = queue.pending().next().cloned() else {
                break;
            };
            let paid = round_money(next.deposited_amount * Decimal::from(percent) / Decimal::from(100))
                .max(Decimal::new(1, 2));
            confirm_deposit(&mut plan, &mut queue, &next.id, paid).unwrap();
            assert_balanced(&plan, &queue);
        }
    }

    /// Resetting the most recent confirmation restores the previous totals.
    #[test]
    fn reset_undoes_the_last_confirmation(
        target_cents in 1_000i64..200_000,
        periods in 2u32..=12,
        percent in 1u32..=99,
    ) {
        let PlanAggregate { mut plan, deposits } = open(target_cents, periods);
        let mut queue = DepositQueue::new(&plan.id, &plan.user_id, deposits);
        let first = queue.pending().next().cloned().unwrap();

        let paid = round_money(first.deposited_amount * Decimal::from(percent) / Decimal::from(100))
            .max(Decimal::new(1, 2));
        confirm_deposit(&mut plan, &mut queue, &first.id, paid).unwrap();
        reset_deposit(&mut plan, &mut queue, &first.id).unwrap();

        prop_assert_eq!(plan.completed_periods, 0);
        prop_assert_eq!(plan.deposited_amount, Decimal::ZERO);
        prop_assert_eq!(queue.pending_count() as u32, periods);
        prop_assert_eq!(queue.pending_total(), plan.target_amount);
    }
}
