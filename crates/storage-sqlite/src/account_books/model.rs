use chrono::NaiveDateTime;
use diesel::prelude::*;

use finbook_core::account_books::AccountBook;

/// Database model for account books
#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::account_books)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct AccountBookDB {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub tag: Option<String>,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<AccountBookDB> for AccountBook {
    fn from(db: AccountBookDB) -> Self {
        AccountBook {
            id: db.id,
            user_id: db.user_id,
            name: db.name,
            tag: db.tag,
            description: db.description,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<AccountBook> for AccountBookDB {
    fn from(book: AccountBook) -> Self {
        AccountBookDB {
            id: book.id,
            user_id: book.user_id,
            name: book.name,
            tag: book.tag,
            description: book.description,
            created_at: book.created_at,
            updated_at: book.updated_at,
        }
    }
}
