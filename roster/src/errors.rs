use crate::api::models::errors::{DbCheckFailure, ErrorResponse};
use crate::db::errors::DbError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    /// The connectivity check endpoint could not reach or query the store
    #[error("Database connection failed")]
    ConnectionCheck(#[source] DbError),

    /// Database operation error
    #[error(transparent)]
    Database(#[from] DbError),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::ConnectionCheck(_) | Error::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns a user-safe error message, without leaking internal implementation details
    pub fn user_message(&self) -> String {
        match self {
            Error::ConnectionCheck(db_err) | Error::Database(db_err) => db_err.to_string(),
        }
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Error::Database(DbError::from(err))
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Full driver detail goes to the log, never to the caller
        match &self {
            Error::ConnectionCheck(db_err) | Error::Database(db_err) => {
                tracing::error!(error = %db_err, detail = %db_err.detail(), "{}", self);
            }
        }

        let status = self.status_code();
        match &self {
            Error::ConnectionCheck(_) => {
                let body = DbCheckFailure {
                    message: self.to_string(),
                    error: self.user_message(),
                };
                (status, Json(body)).into_response()
            }
            _ => (status, Json(ErrorResponse { error: self.user_message() })).into_response(),
        }
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;
