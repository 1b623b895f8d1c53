//! Database repository for users.

use crate::db::{
    errors::Result,
    handlers::repository::Repository,
    models::users::{UserCreateDBRequest, UserDBResponse},
};
use crate::types::UserId;
use sqlx::{FromRow, PgConnection, Postgres, QueryBuilder, Row};
use tracing::{instrument, warn};

pub struct Users<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Users<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Users<'c> {
    type CreateRequest = UserCreateDBRequest;
    type Response = UserDBResponse;

    #[instrument(skip(self, requests), fields(count = requests.len()), err)]
    async fn create_bulk(&mut self, requests: &[Self::CreateRequest]) -> Result<Vec<Self::Response>> {
        if requests.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder = QueryBuilder::<Postgres>::new("INSERT INTO users (name) ");
        builder.push_values(requests, |mut row, request| {
            row.push_bind(&request.name);
        });
        builder.push(" RETURNING id, name, created_at");

        let mut users = builder.build_query_as::<UserDBResponse>().fetch_all(&mut *self.db).await?;

        // RETURNING order isn't guaranteed; ids follow VALUES order
        users.sort_by_key(|user| user.id);
        Ok(users)
    }

    #[instrument(skip(self), err)]
    async fn count(&mut self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&mut *self.db)
            .await?;

        Ok(count)
    }

    /// Rows that fail to decode are logged and skipped, so one bad row never fails the listing.
    #[instrument(skip(self), err)]
    async fn list(&mut self) -> Result<Vec<Self::Response>> {
        let rows = sqlx::query("SELECT id, name, created_at FROM users ORDER BY id")
            .fetch_all(&mut *self.db)
            .await?;

        let mut users = Vec::with_capacity(rows.len());
        for row in &rows {
            match UserDBResponse::from_row(row) {
                Ok(user) => users.push(user),
                Err(e) => {
                    let user_id = row.try_get::<UserId, _>("id").ok();
                    warn!(user_id = ?user_id, error = %e, "Skipping users row that failed to decode");
                }
            }
        }

        Ok(users)
    }
}
