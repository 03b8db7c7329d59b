//! Savings plan domain models.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::period::PeriodUnit;
use crate::errors::{Error, Result, ValidationError};
use crate::utils::money::ensure_within_limit;

/// Lifecycle status of a savings plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    Active,
    Paused,
    Cancelled,
    Completed,
}

impl PlanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanStatus::Active => "active",
            PlanStatus::Paused => "paused",
            PlanStatus::Cancelled => "cancelled",
            PlanStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "active" => Ok(PlanStatus::Active),
            "paused" => Ok(PlanStatus::Paused),
            "cancelled" => Ok(PlanStatus::Cancelled),
            "completed" => Ok(PlanStatus::Completed),
            other => Err(Error::invalid_input(format!("Unknown plan status '{}'", other))),
        }
    }
}

/// Status of a single scheduled deposit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepositStatus {
    Pending,
    Completed,
}

impl DepositStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DepositStatus::Pending => "pending",
            DepositStatus::Completed => "completed",
        }
    }
}

impl FromStr for DepositStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(DepositStatus::Pending),
            "completed" => Ok(DepositStatus::Completed),
            other => Err(Error::invalid_input(format!(
                "Unknown deposit status '{}'",
                other
            ))),
        }
    }
}

/// Lifecycle action requested by a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusAction {
    Pause,
    Resume,
    Terminate,
}

impl StatusAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusAction::Pause => "pause",
            StatusAction::Resume => "resume",
            StatusAction::Terminate => "terminate",
        }
    }
}

/// Domain model representing a savings plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavingsPlan {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Target amount; grows when an overpayment completes the plan.
    #[serde(rename = "amount")]
    pub target_amount: Decimal,
    pub period: PeriodUnit,
    pub total_periods: u32,
    pub completed_periods: u32,
    pub amount_per_period: Decimal,
    pub deposited_amount: Decimal,
    pub status: PlanStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Domain model representing one scheduled or completed deposit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Deposit {
    pub id: String,
    pub plan_id: String,
    pub user_id: String,
    /// Amount originally planned for this slot.
    pub scheduled_amount: Decimal,
    /// Amount still expected while pending, amount paid once completed.
    pub deposited_amount: Decimal,
    pub date: NaiveDate,
    pub status: DepositStatus,
}

impl Deposit {
    pub fn is_pending(&self) -> bool {
        self.status == DepositStatus::Pending
    }
}

/// Input model for creating a new plan.
///
/// Dates and period arrive as raw strings so that malformed values are
/// reported by the schedule resolver instead of a deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSavingsPlan {
    pub name: String,
    pub description: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub amount: Decimal,
    pub period: Option<String>,
    #[serde(rename = "totalPeriods")]
    pub total_periods: Option<u32>,
    /// Client-side estimate; the server derives the real value.
    #[serde(rename = "amountPerPeriod", default)]
    pub amount_per_period: Option<Decimal>,
}

impl NewSavingsPlan {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Plan name cannot be empty".to_string(),
            )));
        }
        if self.amount <= Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Plan amount must be greater than zero".to_string(),
            )));
        }
        ensure_within_limit(self.amount, "Plan amount")?;
        Ok(())
    }
}

/// Input model for editing a plan.
///
/// Omitted schedule fields keep their current value, so an edit that only
/// renames a plan leaves its deposit schedule untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SavingsPlanEdit {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Client-side estimate; the server derives the real value.
    #[serde(default)]
    pub remaining_amount: Option<Decimal>,
    pub remaining_periods: Option<u32>,
    pub new_total_amount: Option<Decimal>,
    pub new_end_date: Option<String>,
}

/// Body of a status change request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StatusChange {
    pub status: StatusAction,
}

/// Body of a deposit confirmation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DepositConfirmation {
    pub id: Option<String>,
    pub deposited_amount: Option<Decimal>,
    pub plan_id: Option<String>,
    /// Manual override of the amount actually paid.
    #[serde(rename = "editableAmount", default)]
    pub editable_amount: Option<Decimal>,
}

impl DepositConfirmation {
    /// The amount paid: the manual override when present, otherwise the
    /// deposit's own amount.
    pub fn paid_amount(&self) -> Result<Decimal> {
        self.editable_amount
            .or(self.deposited_amount)
            .ok_or_else(|| {
                Error::Validation(ValidationError::MissingField(
                    "deposited_amount".to_string(),
                ))
            })
    }
}

/// Body of a deposit reset. Only used to cross-check the target.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DepositReset {
    pub id: Option<String>,
    pub plan_id: Option<String>,
    pub deposited_amount: Option<Decimal>,
}

/// A plan together with all of its deposits, ordered by date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanAggregate {
    pub plan: SavingsPlan,
    pub deposits: Vec<Deposit>,
}

/// Deposit rows to persist after a queue mutation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DepositChanges {
    pub inserted: Vec<Deposit>,
    pub updated: Vec<Deposit>,
    pub deleted: Vec<String>,
}

impl DepositChanges {
    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty() && self.updated.is_empty() && self.deleted.is_empty()
    }
}
