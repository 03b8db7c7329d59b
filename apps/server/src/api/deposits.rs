use std::sync::Arc;

use crate::{
    auth::AuthUser,
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use axum::{
    extract::{Path, Query, State},
    routing::{get, put},
    Json, Router,
};
use finbook_core::savings::{Deposit, DepositConfirmation, DepositReset, PlanAggregate};
use serde::Deserialize;

#[derive(Deserialize)]
struct DepositsQuery {
    savingsplanid: Option<String>,
}

async fn list_deposits(
    user: AuthUser,
    Query(query): Query<DepositsQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Deposit>>> {
    let plan_id = query
        .savingsplanid
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("savingsplanid is required".to_string()))?;
    let deposits = state.savings_service.get_deposits(&user.user_id, &plan_id)?;
    Ok(Json(deposits))
}

async fn confirm_deposit(
    user: AuthUser,
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(confirmation): Json<DepositConfirmation>,
) -> ApiResult<Json<PlanAggregate>> {
    let updated = state
        .savings_service
        .confirm_deposit(&user.user_id, &id, confirmation)
        .await?;
    tracing::debug!(
        "Confirmed deposit {} on plan {} ({}/{} periods)",
        id,
        updated.plan.id,
        updated.plan.completed_periods,
        updated.plan.total_periods
    );
    Ok(Json(updated))
}

async fn reset_deposit(
    user: AuthUser,
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(reset): Json<DepositReset>,
) -> ApiResult<Json<PlanAggregate>> {
    let updated = state
        .savings_service
        .reset_deposit(&user.user_id, &id, reset)
        .await?;
    Ok(Json(updated))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/deposits", get(list_deposits))
        .route("/deposits/{id}", put(confirm_deposit))
        .route("/deposits/reset/{id}", put(reset_deposit))
}
