//! Base repository trait for database operations.

use crate::db::errors::Result;

/// Base repository trait providing common database operations.
///
/// A repository is the data access layer for a single postgres table. The store in this
/// service is append-only from the application's point of view, so the trait covers
/// inserting, counting and listing, and nothing that mutates existing rows.
#[async_trait::async_trait]
pub trait Repository {
    /// The request type for creating entities
    type CreateRequest: Sync;

    /// The response/DTO type returned by operations
    type Response;

    /// Create entities with a single statement, returned in insertion order
    async fn create_bulk(&mut self, requests: &[Self::CreateRequest]) -> Result<Vec<Self::Response>>;

    /// Count all entities
    async fn count(&mut self) -> Result<i64>;

    /// List all entities, ordered by ID
    async fn list(&mut self) -> Result<Vec<Self::Response>>;
}
