//! Utility functions for SQLite storage operations.
//!
//! Chunking for `IN (...)` lists and conversions between column types and
//! domain types.

use finbook_core::errors::{DatabaseError, Error, Result};

/// Maximum number of parameters for SQLite IN (...) queries.
///
/// SQLite has a compile-time limit on the number of parameters in a SQL
/// statement, typically around 999 (SQLITE_MAX_VARIABLE_NUMBER). 500 leaves
/// room for the other parameters of the query.
pub const SQLITE_MAX_PARAMS_CHUNK: usize = 500;

/// Chunk a slice into slices of at most `SQLITE_MAX_PARAMS_CHUNK` items.
pub fn chunk_for_sqlite<T>(items: &[T]) -> impl Iterator<Item = &[T]> {
    items.chunks(SQLITE_MAX_PARAMS_CHUNK)
}

/// Stored counts are `INTEGER` columns; domain counts are unsigned.
pub fn count_to_db(value: u32, column: &str) -> Result<i32> {
    i32::try_from(value).map_err(|_| {
        Error::invalid_input(format!("{} value {} is too large to store", column, value))
    })
}

pub fn count_from_db(value: i32, column: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| {
        Error::Database(DatabaseError::Internal(format!(
            "Column {} holds a negative count {}",
            column, value
        )))
    })
}

/// Wraps a parse failure on a stored value as an internal database error;
/// a bad row is corruption, not bad user input.
pub fn corrupt_column<T>(column: &str, result: Result<T>) -> Result<T> {
    result.map_err(|e| {
        Error::Database(DatabaseError::Internal(format!(
            "Column {} holds an invalid value: {}",
            column, e
        )))
    })
}
