use std::sync::Arc;

use crate::{auth::AuthUser, error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use finbook_core::account_books::{AccountBook, AccountBookInput};

async fn list_account_books(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<AccountBook>>> {
    let books = state.account_book_service.get_account_books(&user.user_id)?;
    Ok(Json(books))
}

async fn create_account_book(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(input): Json<AccountBookInput>,
) -> ApiResult<Json<AccountBook>> {
    let book = state
        .account_book_service
        .create_account_book(&user.user_id, input)
        .await?;
    Ok(Json(book))
}

async fn update_account_book(
    user: AuthUser,
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(input): Json<AccountBookInput>,
) -> ApiResult<Json<AccountBook>> {
    let book = state
        .account_book_service
        .update_account_book(&user.user_id, &id, input)
        .await?;
    Ok(Json(book))
}

async fn delete_account_book(
    user: AuthUser,
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    state
        .account_book_service
        .delete_account_book(&user.user_id, &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/account-books",
            get(list_account_books).post(create_account_book),
        )
        .route(
            "/account-books/{id}",
            put(update_account_book).delete(delete_account_book),
        )
}
