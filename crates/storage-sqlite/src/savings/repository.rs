use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::debug;

use finbook_core::savings::{
    AggregateMutation, Deposit, DepositChanges, DepositQueue, PlanAggregate, SavingsPlan,
    SavingsRepositoryTrait,
};
use finbook_core::{Error, Result};

use super::model::{DepositDB, SavingsPlanDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::{deposits, savings_plans};
use crate::utils::chunk_for_sqlite;

pub struct SavingsRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SavingsRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn load_plan(conn: &mut SqliteConnection, owner: &str, plan_id: &str) -> Result<SavingsPlan> {
    savings_plans::table
        .filter(savings_plans::id.eq(plan_id))
        .filter(savings_plans::user_id.eq(owner))
        .select(SavingsPlanDB::as_select())
        .first::<SavingsPlanDB>(conn)
        .optional()
        .into_core()?
        .ok_or_else(|| Error::not_found(format!("Savings plan {}", plan_id)))?
        .try_into()
}

fn load_deposits(conn: &mut SqliteConnection, plan_id: &str) -> Result<Vec<Deposit>> {
    deposits::table
        .filter(deposits::plan_id.eq(plan_id))
        .order((deposits::date.asc(), deposits::id.asc()))
        .select(DepositDB::as_select())
        .load::<DepositDB>(conn)
        .into_core()?
        .into_iter()
        .map(Deposit::try_from)
        .collect()
}

fn insert_deposits(conn: &mut SqliteConnection, rows: &[Deposit]) -> Result<usize> {
    let rows: Vec<DepositDB> = rows.iter().map(DepositDB::from).collect();
    let mut inserted = 0;
    for chunk in chunk_for_sqlite(&rows) {
        inserted += diesel::insert_into(deposits::table)
            .values(chunk)
            .execute(conn)
            .into_core()?;
    }
    Ok(inserted)
}

/// Writes the rows a deposit queue changed.
fn apply_changes(conn: &mut SqliteConnection, changes: &DepositChanges) -> Result<()> {
    for ids in chunk_for_sqlite(&changes.deleted) {
        diesel::delete(deposits::table.filter(deposits::id.eq_any(ids)))
            .execute(conn)
            .into_core()?;
    }
    for deposit in &changes.updated {
        diesel::update(deposits::table.find(&deposit.id))
            .set(&DepositDB::from(deposit))
            .execute(conn)
            .into_core()?;
    }
    insert_deposits(conn, &changes.inserted)?;
    debug!(
        "Deposit changes: {} inserted, {} updated, {} deleted",
        changes.inserted.len(),
        changes.updated.len(),
        changes.deleted.len()
    );
    Ok(())
}

#[async_trait]
impl SavingsRepositoryTrait for SavingsRepository {
    fn list_plans(&self, user_id: &str) -> Result<Vec<SavingsPlan>> {
        let mut conn = get_connection(&self.pool)?;
        savings_plans::table
            .filter(savings_plans::user_id.eq(user_id))
            .order(savings_plans::created_at.desc())
            .select(SavingsPlanDB::as_select())
            .load::<SavingsPlanDB>(&mut conn)
            .into_core()?
            .into_iter()
            .map(SavingsPlan::try_from)
            .collect()
    }

    fn get_plan(&self, user_id: &str, plan_id: &str) -> Result<SavingsPlan> {
        let mut conn = get_connection(&self.pool)?;
        load_plan(&mut conn, user_id, plan_id)
    }

    fn list_deposits(&self, user_id: &str, plan_id: &str) -> Result<Vec<Deposit>> {
        let mut conn = get_connection(&self.pool)?;
        load_plan(&mut conn, user_id, plan_id)?;
        load_deposits(&mut conn, plan_id)
    }

    fn get_deposit(&self, user_id: &str, deposit_id: &str) -> Result<Deposit> {
        let mut conn = get_connection(&self.pool)?;
        deposits::table
            .filter(deposits::id.eq(deposit_id))
            .filter(deposits::user_id.eq(user_id))
            .select(DepositDB::as_select())
            .first::<DepositDB>(&mut conn)
            .optional()
            .into_core()?
            .ok_or_else(|| Error::not_found(format!("Deposit {}", deposit_id)))?
            .try_into()
    }

    async fn insert_plan(&self, aggregate: PlanAggregate) -> Result<PlanAggregate> {
        self.writer
            .exec(move |conn| -> Result<PlanAggregate> {
                let plan_db = SavingsPlanDB::try_from(&aggregate.plan)?;
                diesel::insert_into(savings_plans::table)
                    .values(&plan_db)
                    .execute(conn)
                    .into_core()?;
                insert_deposits(conn, &aggregate.deposits)?;
                Ok(aggregate)
            })
            .await
    }

    async fn mutate_plan(
        &self,
        user_id: &str,
        plan_id: &str,
        mutation: AggregateMutation,
    ) -> Result<PlanAggregate> {
        let owner = user_id.to_string();
        let plan_id = plan_id.to_string();
        self.writer
            .exec(move |conn| -> Result<PlanAggregate> {
                let mut plan = load_plan(conn, &owner, &plan_id)?;
                let deposits = load_deposits(conn, &plan_id)?;
                let mut queue = DepositQueue::new(&plan_id, &owner, deposits);

                mutation(&mut plan, &mut queue)?;

                plan.updated_at = Utc::now().naive_utc();
                diesel::update(savings_plans::table.find(&plan.id))
                    .set(&SavingsPlanDB::try_from(&plan)?)
                    .execute(conn)
                    .into_core()?;

                let (deposits, changes) = queue.into_changes();
                apply_changes(conn, &changes)?;
                Ok(PlanAggregate { plan, deposits })
            })
            .await
    }

    async fn delete_plan(&self, user_id: &str, plan_id: &str) -> Result<usize> {
        let owner = user_id.to_string();
        let plan_id = plan_id.to_string();
        self.writer
            .exec(move |conn| -> Result<usize> {
                diesel::delete(
                    savings_plans::table
                        .filter(savings_plans::id.eq(plan_id))
                        .filter(savings_plans::user_id.eq(owner)),
                )
                .execute(conn)
                .into_core()
            })
            .await
    }
}
