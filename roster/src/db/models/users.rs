//! Database models for users.

use crate::types::UserId;
use chrono::NaiveDateTime;
use sqlx::FromRow;

/// Database request for creating a new user
#[derive(Debug, Clone)]
pub struct UserCreateDBRequest {
    pub name: String,
}

impl UserCreateDBRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Database response for a user.
///
/// `created_at` is a `TIMESTAMP` without time zone, filled in by the store at insert time.
/// The column is nullable in the schema, so a row with a `NULL` timestamp fails to decode
/// into this struct.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct UserDBResponse {
    pub id: UserId,
    pub name: String,
    pub created_at: NaiveDateTime,
}
