//! JSON bodies returned on failure.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Failure body of `GET /api/test-db`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct DbCheckFailure {
    pub message: String,
    pub error: String,
}

/// Failure body of every other endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}
