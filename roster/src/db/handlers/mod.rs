//! Repository implementations for database access.
//!
//! Each repository:
//! - Wraps a SQLx connection or transaction
//! - Issues a fixed set of statements against one table
//! - Returns records from [`crate::db::models`]
//!
//! # Available Repositories
//!
//! - [`Users`]: The `users` table
//! - [`System`]: Schema management and store liveness
//!
//! # Common Pattern
//!
//! ```ignore
//! use roster::db::handlers::{Repository, Users};
//!
//! async fn example(pool: &sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
//!     let mut conn = pool.acquire().await?;
//!     let mut repo = Users::new(&mut conn);
//!
//!     for user in repo.list().await? {
//!         println!("{} {}", user.id, user.name);
//!     }
//!     Ok(())
//! }
//! ```

pub mod repository;
pub mod system;
pub mod users;

pub use repository::Repository;
pub use system::System;
pub use users::Users;
