use std::sync::Arc;

use crate::{auth::AuthUser, error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use finbook_core::transactions::{Transaction, TransactionInput};

async fn list_transactions(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Transaction>>> {
    let transactions = state.transaction_service.get_transactions(&user.user_id)?;
    Ok(Json(transactions))
}

async fn create_transaction(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(input): Json<TransactionInput>,
) -> ApiResult<Json<Transaction>> {
    let created = state
        .transaction_service
        .create_transaction(&user.user_id, input)
        .await?;
    Ok(Json(created))
}

async fn update_transaction(
    user: AuthUser,
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(input): Json<TransactionInput>,
) -> ApiResult<Json<Transaction>> {
    let updated = state
        .transaction_service
        .update_transaction(&user.user_id, &id, input)
        .await?;
    Ok(Json(updated))
}

async fn delete_transaction(
    user: AuthUser,
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    state
        .transaction_service
        .delete_transaction(&user.user_id, &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/transactions",
            get(list_transactions).post(create_transaction),
        )
        .route(
            "/transactions/{id}",
            put(update_transaction).delete(delete_transaction),
        )
}
