use std::sync::Arc;

use crate::{auth::AuthUser, error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use finbook_core::savings::{
    NewSavingsPlan, PlanAggregate, SavingsPlan, SavingsPlanEdit, StatusChange,
};

async fn list_plans(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<SavingsPlan>>> {
    let plans = state.savings_service.get_plans(&user.user_id)?;
    Ok(Json(plans))
}

async fn get_plan(
    user: AuthUser,
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<SavingsPlan>> {
    let plan = state.savings_service.get_plan(&user.user_id, &id)?;
    Ok(Json(plan))
}

async fn create_plan(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(new_plan): Json<NewSavingsPlan>,
) -> ApiResult<Json<PlanAggregate>> {
    let created = state
        .savings_service
        .create_plan(&user.user_id, new_plan)
        .await?;
    tracing::info!(
        "Created savings plan {} with {} deposits",
        created.plan.id,
        created.deposits.len()
    );
    Ok(Json(created))
}

async fn edit_plan(
    user: AuthUser,
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(edit): Json<SavingsPlanEdit>,
) -> ApiResult<Json<PlanAggregate>> {
    let updated = state
        .savings_service
        .edit_plan(&user.user_id, &id, edit)
        .await?;
    Ok(Json(updated))
}

async fn change_status(
    user: AuthUser,
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(change): Json<StatusChange>,
) -> ApiResult<Json<PlanAggregate>> {
    let updated = state
        .savings_service
        .change_status(&user.user_id, &id, change.status)
        .await?;
    tracing::info!(
        "Savings plan {} is now {}",
        updated.plan.id,
        updated.plan.status.as_str()
    );
    Ok(Json(updated))
}

async fn delete_plan(
    user: AuthUser,
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    state.savings_service.delete_plan(&user.user_id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/savings-plans", get(list_plans).post(create_plan))
        .route(
            "/savings-plans/{id}",
            get(get_plan)
                .put(edit_plan)
                .patch(change_status)
                .delete(delete_plan),
        )
}
