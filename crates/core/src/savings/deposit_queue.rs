//! In-memory view of a plan's deposits that records its own changes.
//!
//! The reconciliation engine mutates a `DepositQueue` loaded inside a write
//! transaction; the storage layer then persists `into_changes()` in that
//! same transaction.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::savings_model::{Deposit, DepositChanges, DepositStatus};
use crate::errors::{Error, Result};

#[derive(Debug, Clone)]
pub struct DepositQueue {
    plan_id: String,
    user_id: String,
    original: Vec<Deposit>,
    deposits: Vec<Deposit>,
}

impl DepositQueue {
    pub fn new(plan_id: &str, user_id: &str, mut deposits: Vec<Deposit>) -> Self {
        deposits.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
        Self {
            plan_id: plan_id.to_string(),
            user_id: user_id.to_string(),
            original: deposits.clone(),
            deposits,
        }
    }

    pub fn deposits(&self) -> &[Deposit] {
        &self.deposits
    }

    pub fn get(&self, deposit_id: &str) -> Option<&Deposit> {
        self.deposits.iter().find(|d| d.id == deposit_id)
    }

    fn get_mut(&mut self, deposit_id: &str) -> Result<&mut Deposit> {
        self.deposits
            .iter_mut()
            .find(|d| d.id == deposit_id)
            .ok_or_else(|| Error::not_found(format!("Deposit {}", deposit_id)))
    }

    pub fn pending(&self) -> impl Iterator<Item = &Deposit> {
        self.deposits.iter().filter(|d| d.is_pending())
    }

    pub fn pending_count(&self) -> usize {
        self.pending().count()
    }

    pub fn pending_total(&self) -> Decimal {
        self.pending().map(|d| d.deposited_amount).sum()
    }

    /// Date of the latest completed deposit, if any.
    pub fn last_completed_date(&self) -> Option<NaiveDate> {
        self.deposits
            .iter()
            .filter(|d| d.status == DepositStatus::Completed)
            .map(|d| d.date)
            .max()
    }

    /// Appends one pending deposit per date, each expecting `amount`.
    pub fn bulk_create(&mut self, dates: &[NaiveDate], amount: Decimal) -> usize {
        for date in dates {
            self.deposits.push(Deposit {
                id: Uuid::new_v4().to_string(),
                plan_id: self.plan_id.clone(),
                user_id: self.user_id.clone(),
                scheduled_amount: amount,
                deposited_amount: amount,
                date: *date,
                status: DepositStatus::Pending,
            });
        }
        self.deposits.sort_by(|a, b| a.date.cmp(&b.date));
        dates.len()
    }

    /// Drops every pending deposit. Completed deposits are history and stay.
    pub fn delete_pending(&mut self) -> usize {
        let before = self.deposits.len();
        self.deposits.retain(|d| !d.is_pending());
        before - self.deposits.len()
    }

    /// Sets the expected amount of every pending deposit, keeping dates.
    pub fn rebalance_pending(&mut self, amount: Decimal) -> usize {
        let mut touched = 0;
        for deposit in self.deposits.iter_mut().filter(|d| d.is_pending()) {
            deposit.deposited_amount = amount;
            touched += 1;
        }
        touched
    }

    /// Moves the difference between `remaining` and the pending total onto
    /// the last pending deposit, absorbing the rounding residual of an even
    /// split.
    pub fn settle_remainder(&mut self, remaining: Decimal) {
        let residual = remaining - self.pending_total();
        if residual.is_zero() {
            return;
        }
        if let Some(last) = self.deposits.iter_mut().rev().find(|d| d.is_pending()) {
            last.deposited_amount += residual;
        }
    }

    /// Marks a pending deposit as paid with `paid`.
    pub fn complete(&mut self, deposit_id: &str, paid: Decimal) -> Result<Deposit> {
        let deposit = self.get_mut(deposit_id)?;
        if deposit.status == DepositStatus::Completed {
            return Err(Error::ConstraintViolation(format!(
                "Deposit {} is already confirmed",
                deposit_id
            )));
        }
        deposit.status = DepositStatus::Completed;
        deposit.deposited_amount = paid;
        Ok(deposit.clone())
    }

    /// Reverts a completed deposit to pending with its scheduled amount.
    /// Returns the amount that had been paid.
    pub fn reopen(&mut self, deposit_id: &str) -> Result<Decimal> {
        let deposit = self.get_mut(deposit_id)?;
        if deposit.status == DepositStatus::Pending {
            return Err(Error::ConstraintViolation(format!(
                "Deposit {} has not been confirmed",
                deposit_id
            )));
        }
        let paid = deposit.deposited_amount;
        deposit.status = DepositStatus::Pending;
        deposit.deposited_amount = deposit.scheduled_amount;
        Ok(paid)
    }

    /// Consumes the queue, returning the final deposits and the rows that
    /// differ from what was loaded.
    pub fn into_changes(self) -> (Vec<Deposit>, DepositChanges) {
        let mut original: HashMap<String, Deposit> = self
            .original
            .into_iter()
            .map(|d| (d.id.clone(), d))
            .collect();

        let mut changes = DepositChanges::default();
        for deposit in &self.deposits {
            match original.remove(&deposit.id) {
                None => changes.inserted.push(deposit.clone()),
                Some(before) if before != *deposit => changes.updated.push(deposit.clone()),
                Some(_) => {}
            }
        }
        let mut deleted: Vec<String> = original.into_keys().collect();
        deleted.sort();
        changes.deleted = deleted;

        (self.deposits, changes)
    }
}
