use std::sync::Arc;

use crate::{auth::AuthUser, error::ApiResult, main_lib::AppState};
use axum::{extract::State, routing::get, Json, Router};
use finbook_core::transactions::{BookSummary, CategoryRatio, CategoryTotal, MonthlySummary};

async fn account_book_summary(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<BookSummary>>> {
    Ok(Json(
        state.transaction_service.account_book_summary(&user.user_id)?,
    ))
}

async fn monthly_summary(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<MonthlySummary>>> {
    Ok(Json(state.transaction_service.monthly_summary(&user.user_id)?))
}

async fn top_categories(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<CategoryTotal>>> {
    Ok(Json(state.transaction_service.top_categories(&user.user_id)?))
}

async fn category_ratio(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<CategoryRatio>>> {
    Ok(Json(state.transaction_service.category_ratio(&user.user_id)?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/account-books-summary", get(account_book_summary))
        .route("/monthly-summary", get(monthly_summary))
        .route("/top-categories", get(top_categories))
        .route("/category-ratio", get(category_ratio))
}
