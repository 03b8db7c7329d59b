use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use diesel::prelude::*;

use finbook_core::users::{User, UserRepositoryTrait};
use finbook_core::{Error, Result};

use super::model::UserDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::users;

pub struct UserRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl UserRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }

    // Runs an update on one user row, failing with NotFound when it is missing.
    async fn update_user<F>(&self, user_id: &str, update: F) -> Result<()>
    where
        F: FnOnce(&mut SqliteConnection, &str) -> QueryResult<usize> + Send + 'static,
    {
        let user_id = user_id.to_string();
        self.writer
            .exec(move |conn| -> Result<()> {
                let updated = update(conn, &user_id).into_core()?;
                if updated == 0 {
                    return Err(Error::not_found(format!("User {}", user_id)));
                }
                Ok(())
            })
            .await
    }
}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let mut conn = get_connection(&self.pool)?;
        let user = users::table
            .filter(users::email.eq(email))
            .select(UserDB::as_select())
            .first::<UserDB>(&mut conn)
            .optional()
            .into_core()?;
        Ok(user.map(User::from))
    }

    fn find_by_reset_token(&self, token: &str) -> Result<Option<User>> {
        let mut conn = get_connection(&self.pool)?;
        let user = users::table
            .filter(users::reset_token.eq(token))
            .select(UserDB::as_select())
            .first::<UserDB>(&mut conn)
            .optional()
            .into_core()?;
        Ok(user.map(User::from))
    }

    fn get_by_id(&self, user_id: &str) -> Result<User> {
        let mut conn = get_connection(&self.pool)?;
        users::table
            .find(user_id)
            .select(UserDB::as_select())
            .first::<UserDB>(&mut conn)
            .optional()
            .into_core()?
            .map(User::from)
            .ok_or_else(|| Error::not_found(format!("User {}", user_id)))
    }

    async fn insert(&self, user: User) -> Result<User> {
        self.writer
            .exec(move |conn| -> Result<User> {
                let row = UserDB::from(user);
                diesel::insert_into(users::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(row.into())
            })
            .await
    }

    async fn update_password_hash(&self, user_id: &str, password_hash: String) -> Result<()> {
        self.update_user(user_id, move |conn, id| {
            diesel::update(users::table.find(id))
                .set((
                    users::password_hash.eq(password_hash),
                    users::reset_token.eq(None::<String>),
                    users::reset_token_expiration.eq(None::<NaiveDateTime>),
                ))
                .execute(conn)
        })
        .await
    }

    async fn set_reset_token(
        &self,
        user_id: &str,
        token: String,
        expires_at: NaiveDateTime,
    ) -> Result<()> {
        self.update_user(user_id, move |conn, id| {
            diesel::update(users::table.find(id))
                .set((
                    users::reset_token.eq(Some(token)),
                    users::reset_token_expiration.eq(Some(expires_at)),
                ))
                .execute(conn)
        })
        .await
    }

    async fn update_avatar_url(&self, user_id: &str, avatar_url: String) -> Result<()> {
        self.update_user(user_id, move |conn, id| {
            diesel::update(users::table.find(id))
                .set(users::avatar_url.eq(Some(avatar_url)))
                .execute(conn)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::setup;
    use chrono::Utc;
    use finbook_core::errors::DatabaseError;

    fn user(id: &str, email: &str) -> User {
        User {
            id: id.to_string(),
            nickname: "Nick".to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$stub".to_string(),
            avatar_url: None,
            reset_token: None,
            reset_token_expiration: None,
            created_at: Utc::now().naive_utc(),
        }
    }

    #[tokio::test]
    async fn test_insert_find_and_update() {
        let db = setup();
        let repo = UserRepository::new(db.pool.clone(), db.writer.clone());

        repo.insert(user("u1", "nick@example.com")).await.unwrap();
        let found = repo.find_by_email("nick@example.com").unwrap().unwrap();
        assert_eq!(found.id, "u1");
        assert!(repo.find_by_email("nobody@example.com").unwrap().is_none());

        repo.update_password_hash("u1", "new-hash".to_string())
            .await
            .unwrap();
        assert_eq!(repo.get_by_id("u1").unwrap().password_hash, "new-hash");
        assert!(repo.get_by_id("u2").unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_unique_violation() {
        let db = setup();
        let repo = UserRepository::new(db.pool.clone(), db.writer.clone());
        repo.insert(user("u1", "dup@example.com")).await.unwrap();
        let err = repo.insert(user("u2", "dup@example.com")).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Database(DatabaseError::UniqueViolation(_))
        ));
    }

    #[tokio::test]
    async fn test_reset_token_round_trip_and_clear_on_password_change() {
        let db = setup();
        let repo = UserRepository::new(db.pool.clone(), db.writer.clone());
        repo.insert(user("u1", "nick@example.com")).await.unwrap();

        let expires = Utc::now().naive_utc() + chrono::Duration::minutes(15);
        repo.set_reset_token("u1", "tok-123".to_string(), expires)
            .await
            .unwrap();
        let found = repo.find_by_reset_token("tok-123").unwrap().unwrap();
        assert_eq!(found.id, "u1");
        assert_eq!(found.reset_token.as_deref(), Some("tok-123"));
        assert!(repo.find_by_reset_token("other").unwrap().is_none());

        repo.update_password_hash("u1", "new-hash".to_string())
            .await
            .unwrap();
        let user = repo.get_by_id("u1").unwrap();
        assert_eq!(user.password_hash, "new-hash");
        assert_eq!(user.reset_token, None);
        assert_eq!(user.reset_token_expiration, None);
        assert!(repo.find_by_reset_token("tok-123").unwrap().is_none());

        let err = repo
            .set_reset_token("ghost", "tok".to_string(), expires)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_avatar_url() {
        let db = setup();
        let repo = UserRepository::new(db.pool.clone(), db.writer.clone());
        repo.insert(user("u1", "nick@example.com")).await.unwrap();

        repo.update_avatar_url("u1", "/uploads/u1.png".to_string())
            .await
            .unwrap();
        assert_eq!(
            repo.get_by_id("u1").unwrap().avatar_url.as_deref(),
            Some("/uploads/u1.png")
        );
        assert!(repo
            .update_avatar_url("ghost", "/uploads/x.png".to_string())
            .await
            .unwrap_err()
            .is_not_found());
    }
}
