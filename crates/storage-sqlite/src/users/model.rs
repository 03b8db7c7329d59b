use chrono::NaiveDateTime;
use diesel::prelude::*;

use finbook_core::users::User;

/// Database model for users
#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserDB {
    pub id: String,
    pub nickname: String,
    pub email: String,
    pub password_hash: String,
    pub avatar_url: Option<String>,
    pub created_at: NaiveDateTime,
    pub reset_token: Option<String>,
    pub reset_token_expiration: Option<NaiveDateTime>,
}

impl From<UserDB> for User {
    fn from(db: UserDB) -> Self {
        User {
            id: db.id,
            nickname: db.nickname,
            email: db.email,
            password_hash: db.password_hash,
            avatar_url: db.avatar_url,
            reset_token: db.reset_token,
            reset_token_expiration: db.reset_token_expiration,
            created_at: db.created_at,
        }
    }
}

impl From<User> for UserDB {
    fn from(user: User) -> Self {
        UserDB {
            id: user.id,
            nickname: user.nickname,
            email: user.email,
            password_hash: user.password_hash,
            avatar_url: user.avatar_url,
            created_at: user.created_at,
            reset_token: user.reset_token,
            reset_token_expiration: user.reset_token_expiration,
        }
    }
}
