//! HTTP handlers for liveness and store connectivity checks.

use axum::{Json, extract::State};

use crate::{
    AppState,
    api::models::{
        errors::DbCheckFailure,
        health::{DbCheckResponse, HealthResponse},
    },
    db::{errors::DbError, handlers::System},
    errors::Error,
};

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    summary = "Liveness check",
    description = "Always healthy while the process is serving. Does not touch the database.",
    responses(
        (status = 200, description = "Process is up", body = HealthResponse),
    )
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[utoipa::path(
    get,
    path = "/api/test-db",
    tag = "health",
    summary = "Database connectivity check",
    description = "Runs a trivial query against the database and reports its current time.",
    responses(
        (status = 200, description = "Database reachable", body = DbCheckResponse),
        (status = 500, description = "Database unreachable or query failed", body = DbCheckFailure),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn test_db(State(state): State<AppState>) -> Result<Json<DbCheckResponse>, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::ConnectionCheck(DbError::from(e)))?;
    let timestamp = System::new(&mut conn).now().await.map_err(Error::ConnectionCheck)?;

    Ok(Json(DbCheckResponse {
        message: "Database connection successful!".to_string(),
        timestamp,
    }))
}
