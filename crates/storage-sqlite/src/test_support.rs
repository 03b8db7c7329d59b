//! Shared fixtures for repository tests.

use std::sync::Arc;

use chrono::Utc;
use diesel::prelude::*;
use tempfile::TempDir;

use crate::db::{create_pool, init, run_migrations, spawn_writer, DbPool, WriteHandle};
use crate::schema::users;

pub struct TestDb {
    // Keeps the database file alive for the duration of the test.
    _dir: TempDir,
    pub pool: Arc<DbPool>,
    pub writer: WriteHandle,
}

/// Fresh migrated database in a temporary directory. Must run inside a
/// Tokio runtime because the writer actor is spawned on it.
pub fn setup() -> TestDb {
    let dir = tempfile::tempdir().unwrap();
    let db_path = init(dir.path().join("test.db").to_str().unwrap()).unwrap();
    let pool = create_pool(&db_path).unwrap();
    run_migrations(&pool).unwrap();
    let writer = spawn_writer(&pool).unwrap();
    TestDb {
        _dir: dir,
        pool,
        writer,
    }
}

/// Inserts a bare user row so owner foreign keys resolve.
pub fn insert_user(db: &TestDb, id: &str) {
    let mut conn = db.pool.get().unwrap();
    diesel::insert_into(users::table)
        .values((
            users::id.eq(id),
            users::nickname.eq(id),
            users::email.eq(format!("{}@example.com", id)),
            users::password_hash.eq("hash"),
            users::created_at.eq(Utc::now().naive_utc()),
        ))
        .execute(&mut conn)
        .unwrap();
}
