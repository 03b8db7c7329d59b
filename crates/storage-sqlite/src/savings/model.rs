//! Database models for savings plans and deposits.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use finbook_core::savings::{Deposit, SavingsPlan};
use finbook_core::utils::money::parse_money;
use finbook_core::utils::time_utils::{format_date, parse_date};
use finbook_core::Error;

use crate::utils::{corrupt_column, count_from_db, count_to_db};

/// Database model for savings plans
#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::savings_plans)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct SavingsPlanDB {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub target_amount: String,
    pub period: String,
    pub total_periods: i32,
    pub completed_periods: i32,
    pub amount_per_period: String,
    pub deposited_amount: String,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Database model for deposits
#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::deposits)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DepositDB {
    pub id: String,
    pub plan_id: String,
    pub user_id: String,
    pub scheduled_amount: String,
    pub deposited_amount: String,
    pub date: String,
    pub status: String,
}

impl TryFrom<SavingsPlanDB> for SavingsPlan {
    type Error = Error;

    fn try_from(db: SavingsPlanDB) -> Result<Self, Self::Error> {
        Ok(SavingsPlan {
            start_date: corrupt_column("start_date", parse_date(&db.start_date, "start_date"))?,
            end_date: corrupt_column("end_date", parse_date(&db.end_date, "end_date"))?,
            target_amount: corrupt_column(
                "target_amount",
                parse_money(&db.target_amount, "target_amount"),
            )?,
            period: corrupt_column("period", db.period.parse())?,
            total_periods: count_from_db(db.total_periods, "total_periods")?,
            completed_periods: count_from_db(db.completed_periods, "completed_periods")?,
            amount_per_period: corrupt_column(
                "amount_per_period",
                parse_money(&db.amount_per_period, "amount_per_period"),
            )?,
            deposited_amount: corrupt_column(
                "deposited_amount",
                parse_money(&db.deposited_amount, "deposited_amount"),
            )?,
            status: corrupt_column("status", db.status.parse())?,
            id: db.id,
            user_id: db.user_id,
            name: db.name,
            description: db.description,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}

impl TryFrom<&SavingsPlan> for SavingsPlanDB {
    type Error = Error;

    fn try_from(plan: &SavingsPlan) -> Result<Self, Self::Error> {
        Ok(SavingsPlanDB {
            id: plan.id.clone(),
            user_id: plan.user_id.clone(),
            name: plan.name.clone(),
            description: plan.description.clone(),
            start_date: format_date(plan.start_date),
            end_date: format_date(plan.end_date),
            target_amount: plan.target_amount.to_string(),
            period: plan.period.as_str().to_string(),
            total_periods: count_to_db(plan.total_periods, "total_periods")?,
            completed_periods: count_to_db(plan.completed_periods, "completed_periods")?,
            amount_per_period: plan.amount_per_period.to_string(),
            deposited_amount: plan.deposited_amount.to_string(),
            status: plan.status.as_str().to_string(),
            created_at: plan.created_at,
            updated_at: plan.updated_at,
        })
    }
}

impl TryFrom<DepositDB> for Deposit {
    type Error = Error;

    fn try_from(db: DepositDB) -> Result<Self, Self::Error> {
        Ok(Deposit {
            scheduled_amount: corrupt_column(
                "scheduled_amount",
                parse_money(&db.scheduled_amount, "scheduled_amount"),
            )?,
            deposited_amount: corrupt_column(
                "deposited_amount",
                parse_money(&db.deposited_amount, "deposited_amount"),
            )?,
            date: corrupt_column("date", parse_date(&db.date, "date"))?,
            status: corrupt_column("status", db.status.parse())?,
            id: db.id,
            plan_id: db.plan_id,
            user_id: db.user_id,
        })
    }
}

impl From<&Deposit> for DepositDB {
    fn from(deposit: &Deposit) -> Self {
        DepositDB {
            id: deposit.id.clone(),
            plan_id: deposit.plan_id.clone(),
            user_id: deposit.user_id.clone(),
            scheduled_amount: deposit.scheduled_amount.to_string(),
            deposited_amount: deposit.deposited_amount.to_string(),
            date: format_date(deposit.date),
            status: deposit.status.as_str().to_string(),
        }
    }
}
