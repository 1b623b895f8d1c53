//! Schema management and liveness checks against the store itself.

use crate::db::errors::Result;
use chrono::{DateTime, Utc};
use sqlx::PgConnection;
use tracing::instrument;

const CREATE_USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id SERIAL PRIMARY KEY,
    name VARCHAR(100) NOT NULL,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)"#;

pub struct System<'c> {
    db: &'c mut PgConnection,
}

impl<'c> System<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Create the `users` table if it is absent. Running it against an existing table changes nothing.
    #[instrument(skip(self), err)]
    pub async fn ensure_users_table(&mut self) -> Result<()> {
        sqlx::query(CREATE_USERS_TABLE).execute(&mut *self.db).await?;
        Ok(())
    }

    /// The store's current time, as a liveness probe
    #[instrument(skip(self), err)]
    pub async fn now(&mut self) -> Result<DateTime<Utc>> {
        let now = sqlx::query_scalar::<_, DateTime<Utc>>("SELECT NOW()")
            .fetch_one(&mut *self.db)
            .await?;
        Ok(now)
    }
}
