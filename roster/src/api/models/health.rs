//! API response models for health and connectivity checks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

/// Body of a successful `GET /api/test-db`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct DbCheckResponse {
    pub message: String,
    /// The store's current time
    pub timestamp: DateTime<Utc>,
}
