use std::{path::PathBuf, sync::Arc};

use crate::{
    auth::{Argon2Hasher, AuthManager},
    config::Config,
    mailer::LogMailer,
};
use finbook_core::{
    account_books::{AccountBookRepositoryTrait, AccountBookService, AccountBookServiceTrait},
    savings::{SavingsService, SavingsServiceTrait},
    transactions::{TransactionService, TransactionServiceTrait},
    users::{Mailer, UserService, UserServiceTrait},
};
use finbook_storage_sqlite::{
    db, AccountBookRepository, SavingsRepository, TransactionRepository, UserRepository,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait>,
    pub savings_service: Arc<dyn SavingsServiceTrait>,
    pub account_book_service: Arc<dyn AccountBookServiceTrait>,
    pub transaction_service: Arc<dyn TransactionServiceTrait>,
    pub auth: Arc<AuthManager>,
    pub upload_dir: PathBuf,
}

pub fn init_tracing() {
    let log_format = std::env::var("FB_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    build_state_with_mailer(config, Arc::new(LogMailer::new(&config.public_url))).await
}

pub async fn build_state_with_mailer(
    config: &Config,
    mailer: Arc<dyn Mailer>,
) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer(&pool)?;

    let user_repository = Arc::new(UserRepository::new(pool.clone(), writer.clone()));
    let user_service = Arc::new(UserService::new(
        user_repository,
        Arc::new(Argon2Hasher),
        mailer,
    ));

    let savings_repository = Arc::new(SavingsRepository::new(pool.clone(), writer.clone()));
    let savings_service = Arc::new(SavingsService::new(savings_repository));

    let account_book_repository: Arc<dyn AccountBookRepositoryTrait> =
        Arc::new(AccountBookRepository::new(pool.clone(), writer.clone()));
    let account_book_service = Arc::new(AccountBookService::new(account_book_repository.clone()));

    let transaction_repository = Arc::new(TransactionRepository::new(pool.clone(), writer.clone()));
    let transaction_service = Arc::new(TransactionService::new(
        transaction_repository,
        account_book_repository,
    ));

    Ok(Arc::new(AppState {
        user_service,
        savings_service,
        account_book_service,
        transaction_service,
        auth: Arc::new(AuthManager::new(&config.auth)),
        upload_dir: config.upload_dir.clone(),
    }))
}
