use thiserror::Error;

/// Unified error type for database operations that application code can handle.
///
/// The display strings are stable and safe to hand to API callers; the underlying
/// `sqlx::Error` is kept as the source so it can be logged server-side.
#[derive(Error, Debug)]
pub enum DbError {
    /// The store could not be reached (connect failure, pool timeout, broken socket)
    #[error("database is unreachable")]
    Unreachable(#[source] sqlx::Error),

    /// The store was reached but rejected or failed the statement
    #[error("database query failed")]
    QueryFailed(#[source] sqlx::Error),

    /// A row came back that does not map onto the expected record shape
    #[error("stored data could not be decoded")]
    DecodeFailed(#[source] sqlx::Error),
}

impl DbError {
    /// The raw driver error, for logs only
    pub fn detail(&self) -> &sqlx::Error {
        match self {
            DbError::Unreachable(err) | DbError::QueryFailed(err) | DbError::DecodeFailed(err) => err,
        }
    }
}

/// Convert from sqlx::Error using sqlx's own error categories
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => DbError::Unreachable(err),
            sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::Decode(_)
            | sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::ColumnIndexOutOfBounds { .. }
            | sqlx::Error::TypeNotFound { .. } => DbError::DecodeFailed(err),
            _ => DbError::QueryFailed(err),
        }
    }
}

/// Type alias for database operation results
pub type Result<T> = std::result::Result<T, DbError>;
